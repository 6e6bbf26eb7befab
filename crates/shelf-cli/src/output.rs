//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use shelf_core::catalog::{render_book, render_books};
use shelf_core::Book;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) -> Result<()> {
        println!("{}", self.format_book(book)?);
        Ok(())
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) -> Result<()> {
        println!("{}", self.format_books(books)?);
        Ok(())
    }

    fn format_book(&self, book: &Book) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => render_book(book),
            OutputFormat::Json => serde_json::to_string_pretty(book)?,
            OutputFormat::Quiet => book.id.to_string(),
        })
    }

    fn format_books(&self, books: &[Book]) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    render_books(books)
                } else {
                    format!("{}\n\n{} book(s)", render_books(books), books.len())
                }
            }
            OutputFormat::Json => serde_json::to_string_pretty(books)?,
            OutputFormat::Quiet => books
                .iter()
                .map(|b| b.id.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::Status;

    fn books() -> Vec<Book> {
        let mut lent = Book::new(2, "Solaris", "Stanisław Lem", 1961);
        lent.status = Status::CheckedOut;
        vec![Book::new(1, "Dune", "Frank Herbert", 1965), lent]
    }

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_human_books() {
        let output = Output::new(OutputFormat::Human);
        let text = output.format_books(&books()).unwrap();

        assert!(text.starts_with("Book list:\nID: 1 | Title: Dune"));
        assert!(text.ends_with("2 book(s)"));
        assert_eq!(output.format_books(&[]).unwrap(), "No books found.");
    }

    #[test]
    fn test_json_books() {
        let output = Output::new(OutputFormat::Json);
        let text = output.format_books(&books()).unwrap();

        let parsed: Vec<Book> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, books());
        assert!(text.contains("\"checked out\""));
    }

    #[test]
    fn test_quiet_prints_ids() {
        let output = Output::new(OutputFormat::Quiet);

        assert_eq!(output.format_books(&books()).unwrap(), "1\n2");
        assert_eq!(output.format_book(&books()[1]).unwrap(), "2");
    }
}
