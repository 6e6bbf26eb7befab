//! Interactive menu
//!
//! Numbered menu over the catalog. Each action collects its fields through
//! the [`Prompter`], so bad input is re-asked and never reaches the store.

use std::io::{BufRead, Write};

use anyhow::Result;
use shelf_core::models::join_fields;
use shelf_core::{Catalog, SearchField, Status};

use crate::prompt::{Input, Prompter};

/// Menu entries: key, label, action
const ITEMS: [(&str, &str, Action); 6] = [
    ("1", "Add book", Action::Add),
    ("2", "Delete book", Action::Delete),
    ("3", "Search books", Action::Search),
    ("4", "Show all books", Action::List),
    ("5", "Change book status", Action::UpdateStatus),
    ("6", "Exit", Action::Exit),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Delete,
    Search,
    List,
    UpdateStatus,
    Exit,
}

/// Extracts the value of an [`Input`], or returns from the action on cancel
macro_rules! or_cancel {
    ($input:expr) => {
        match $input {
            Input::Value(value) => value,
            Input::Cancelled => return Ok(()),
        }
    };
}

pub struct Menu<'a, R, W> {
    catalog: &'a mut Catalog,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            prompter: Prompter::new(input, output),
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;

            let Some(choice) = self.prompter.read_line("Choose an action")? else {
                return Ok(());
            };

            let Some(&(_, _, action)) = ITEMS.iter().find(|(key, _, _)| *key == choice) else {
                self.prompter.say("Invalid choice. Try again.")?;
                continue;
            };

            if action == Action::Exit {
                self.prompter.say("Goodbye!")?;
                return Ok(());
            }

            if let Err(e) = self.dispatch(action) {
                tracing::warn!("Menu action {:?} failed: {:#}", action, e);
                self.prompter.say(format_args!("Error: {:#}", e))?;
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        self.prompter.say("\nMenu:")?;
        for (key, label, _) in ITEMS {
            self.prompter.say(format_args!("{}. {}", key, label))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Add => self.add_book(),
            Action::Delete => self.delete_book(),
            Action::Search => self.search_books(),
            Action::List => self.list_books(),
            Action::UpdateStatus => self.update_status(),
            Action::Exit => Ok(()),
        }
    }

    fn add_book(&mut self) -> Result<()> {
        self.prompter.begin_form()?;
        let title = or_cancel!(self.prompter.text("Title")?);
        let author = or_cancel!(self.prompter.text("Author")?);
        let year: i32 = or_cancel!(self.prompter.integer("Year published")?);

        let id = self.catalog.add(&title, &author, year)?;
        self.prompter.say(format_args!("Book added with ID {}.", id))?;
        Ok(())
    }

    fn delete_book(&mut self) -> Result<()> {
        self.prompter.begin_form()?;
        let id: u64 = or_cancel!(self.prompter.integer("Book ID")?);

        if !self.show_current(id)? {
            return Ok(());
        }

        let answer = or_cancel!(self.prompter.choice("Delete this book? (y/n)", &["y", "n"])?);
        if answer != "y" {
            self.prompter.say("Action cancelled. Returning to the menu.")?;
            return Ok(());
        }

        if self.catalog.delete(id)? {
            self.prompter.say("Book deleted.")?;
        } else {
            self.prompter.say(format_args!("Could not delete book with ID {}.", id))?;
        }
        Ok(())
    }

    fn search_books(&mut self) -> Result<()> {
        let fields: Vec<SearchField> = self.catalog.search_fields().to_vec();
        let names: Vec<&str> = fields.iter().map(SearchField::as_str).collect();

        self.prompter.begin_form()?;
        let prompt = format!("Search field ({})", join_fields(&fields));
        let field = or_cancel!(self.prompter.choice(&prompt, &names)?);
        let query = or_cancel!(self.prompter.text("Search for")?);

        let books = self.catalog.search(&query, &field)?;
        let listing = self.catalog.render(Some(books.as_slice()));
        self.prompter.say(listing)?;
        Ok(())
    }

    fn list_books(&mut self) -> Result<()> {
        let listing = self.catalog.render(None);
        self.prompter.say(listing)?;
        Ok(())
    }

    fn update_status(&mut self) -> Result<()> {
        self.prompter.begin_form()?;
        let id: u64 = or_cancel!(self.prompter.integer("Book ID")?);

        if !self.show_current(id)? {
            return Ok(());
        }

        let options: Vec<&str> = Status::ALL.iter().map(Status::as_str).collect();
        let prompt = format!("New status ({})", options.join("/"));
        let answer = or_cancel!(self.prompter.choice(&prompt, &options)?);
        let status: Status = answer.parse()?;

        if self.catalog.update_status(id, status)? {
            self.prompter.say("Status updated.")?;
        } else {
            self.prompter.say("No book with that ID.")?;
        }
        Ok(())
    }

    /// Print the book's title and status; false if there is no such book
    fn show_current(&mut self, id: u64) -> Result<bool> {
        let Some(book) = self.catalog.get(id) else {
            self.prompter.say("No book with that ID.")?;
            return Ok(false);
        };

        let summary = format!("Book: {}\nCurrent status: {}", book.title, book.status);
        self.prompter.say(summary)?;
        Ok(true)
    }
}
