//! Interactive input
//!
//! Line-based prompting with validation and retry. Typing `!stop` in any
//! field cancels the whole form.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;

/// Typed in any field to abandon the current form
pub const STOP_WORD: &str = "!stop";

/// Outcome of asking for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<T> {
    Value(T),
    /// `!stop` was entered or input ended
    Cancelled,
}

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line of output
    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Print the cancellation hint shown before each form
    pub fn begin_form(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nType '{}' in any field to cancel.", STOP_WORD)
    }

    /// Prompt and read one trimmed line; `None` at end of input
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer
    ///
    /// Rejections are printed as `Input error: <reason>.` and the field is
    /// asked again.
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<Input<T>> {
        loop {
            let Some(answer) = self.read_line(prompt)? else {
                return Ok(Input::Cancelled);
            };

            if answer.eq_ignore_ascii_case(STOP_WORD) {
                self.say("Action cancelled. Returning to the menu.")?;
                return Ok(Input::Cancelled);
            }

            match parse(&answer) {
                Ok(value) => return Ok(Input::Value(value)),
                Err(reason) => self.say(format_args!("Input error: {}.", reason))?,
            }
        }
    }

    /// Non-empty text
    pub fn text(&mut self, prompt: &str) -> Result<Input<String>> {
        self.ask(prompt, parse_text)
    }

    /// A whole number
    pub fn integer<T: FromStr>(&mut self, prompt: &str) -> Result<Input<T>> {
        self.ask(prompt, parse_integer)
    }

    /// One of `options`, compared case-insensitively; returned lowercased
    pub fn choice(&mut self, prompt: &str, options: &[&str]) -> Result<Input<String>> {
        self.ask(prompt, |answer| parse_choice(answer, options))
    }
}

fn parse_text(answer: &str) -> std::result::Result<String, String> {
    if answer.is_empty() {
        Err("Value cannot be empty".to_string())
    } else {
        Ok(answer.to_string())
    }
}

fn parse_integer<T: FromStr>(answer: &str) -> std::result::Result<T, String> {
    answer
        .parse()
        .map_err(|_| "Invalid value. Expected a whole number".to_string())
}

fn parse_choice(answer: &str, options: &[&str]) -> std::result::Result<String, String> {
    let answer = answer.to_lowercase();
    if options.iter().any(|o| o.eq_ignore_ascii_case(&answer)) {
        Ok(answer)
    } else {
        Err(format!("Invalid value. Expected one of: {}", options.join(", ")))
    }
}

/// Ask a yes/no question on the terminal
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.output.clone()).unwrap()
    }

    #[test]
    fn test_text_retries_on_empty() {
        let mut p = prompter("\n  \nDune\n");

        assert_eq!(p.text("Title").unwrap(), Input::Value("Dune".to_string()));
        let out = written(&p);
        assert_eq!(out.matches("Input error: Value cannot be empty.").count(), 2);
        assert_eq!(out.matches("Title: ").count(), 3);
    }

    #[test]
    fn test_integer_retries_on_garbage() {
        let mut p = prompter("nineteen\n1965\n");

        assert_eq!(p.integer::<i32>("Year").unwrap(), Input::Value(1965));
        assert!(written(&p).contains("Expected a whole number"));
    }

    #[test]
    fn test_integer_rejects_negative_for_unsigned() {
        let mut p = prompter("-1\n3\n");

        assert_eq!(p.integer::<u64>("ID").unwrap(), Input::Value(3));
    }

    #[test]
    fn test_choice_is_case_insensitive() {
        let mut p = prompter("maybe\nY\n");

        assert_eq!(
            p.choice("Delete? (y/n)", &["y", "n"]).unwrap(),
            Input::Value("y".to_string())
        );
        assert!(written(&p).contains("Expected one of: y, n"));
    }

    #[test]
    fn test_stop_cancels() {
        let mut p = prompter("!STOP\n");

        assert_eq!(p.text("Title").unwrap(), Input::Cancelled);
        assert!(written(&p).contains("Action cancelled"));
    }

    #[test]
    fn test_end_of_input_cancels() {
        let mut p = prompter("");

        assert_eq!(p.integer::<u64>("ID").unwrap(), Input::Cancelled);
    }

    #[test]
    fn test_begin_form_prints_hint() {
        let mut p = prompter("");
        p.begin_form().unwrap();

        assert!(written(&p).contains("Type '!stop' in any field to cancel."));
    }
}
