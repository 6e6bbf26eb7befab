//! Catalog facade
//!
//! Thin layer between the user interface and the [`Store`]: every
//! operation delegates directly, plus a plain-text renderer for book lists.

use crate::config::Config;
use crate::error::Result;
use crate::models::{Book, SearchField, Status};
use crate::store::Store;

/// Shown instead of a listing when there is nothing to list
pub const NO_BOOKS: &str = "No books found.";

/// First line of a non-empty listing
pub const LIST_HEADER: &str = "Book list:";

/// Entry point for menu and command handlers
#[derive(Debug)]
pub struct Catalog {
    store: Store,
}

impl Catalog {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open the catalog backed by the data file named in `config`
    pub fn open(config: Config) -> Result<Self> {
        Ok(Self::new(Store::open_with_config(config)?))
    }

    /// Fields the user may search by
    pub fn search_fields(&self) -> &[SearchField] {
        &self.store.config().search_fields
    }

    pub fn add(&mut self, title: &str, author: &str, year: i32) -> Result<u64> {
        self.store.add(title, author, year)
    }

    pub fn delete(&mut self, id: u64) -> Result<bool> {
        self.store.delete(id)
    }

    /// Search by field name, e.g. `search("herbert", "author")`
    pub fn search(&self, query: &str, field: &str) -> Result<Vec<Book>> {
        self.store.search_by_name(query, field)
    }

    pub fn update_status(&mut self, id: u64, status: Status) -> Result<bool> {
        self.store.update_status(id, status)
    }

    pub fn get(&self, id: u64) -> Option<&Book> {
        self.store.get_by_id(id)
    }

    pub fn books(&self) -> &[Book] {
        self.store.books()
    }

    /// Render `books`, or the whole catalog when `None`
    pub fn render(&self, books: Option<&[Book]>) -> String {
        render_books(books.unwrap_or_else(|| self.store.books()))
    }
}

/// One line per book under a header, or [`NO_BOOKS`]
pub fn render_books(books: &[Book]) -> String {
    if books.is_empty() {
        return NO_BOOKS.to_string();
    }

    std::iter::once(LIST_HEADER.to_string())
        .chain(books.iter().map(render_book))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `ID: 1 | Title: … | Author: … | Year: … | Status: …`
pub fn render_book(book: &Book) -> String {
    format!(
        "ID: {} | Title: {} | Author: {} | Year: {} | Status: {}",
        book.id, book.title, book.author, book.year, book.status
    )
}
