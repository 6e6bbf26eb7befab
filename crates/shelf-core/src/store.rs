//! Book store
//!
//! The `Store` keeps the whole catalog in memory, in insertion order, and
//! rewrites the backing file after every change.
//!
//! ## Ids
//!
//! Ids come from a counter that only grows. It is persisted next to the
//! data file and, on open, raised past the largest id already stored, so an
//! id is never handed out twice even after deletions.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(config)?;
//!
//! let id = store.add("Dune", "Frank Herbert", 1965)?;
//! store.update_status(id, Status::CheckedOut)?;
//!
//! let hits = store.search("dune", SearchField::Title);
//! ```

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Book, SearchField, Status};
use crate::storage::{JsonPersistence, StorageError};

/// File-backed, in-memory book collection
pub struct Store {
    /// Books in insertion order
    books: Vec<Book>,
    /// Next id to hand out
    next_id: u64,
    /// JSON persistence handler
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store with a specific configuration
    ///
    /// A missing data file yields an empty store. A malformed one is an
    /// error and nothing is loaded.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(&config);
        let mut store = Self {
            books: Vec::new(),
            next_id: 1,
            persistence,
            config,
        };
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory collection with the contents of the data file
    pub fn load(&mut self) -> Result<()> {
        let books = self.persistence.load_books()?;
        let stored_next = self.persistence.load_next_id()?.unwrap_or(1);
        let past_max = match books.iter().map(|b| b.id).max() {
            Some(max_id) => max_id
                .checked_add(1)
                .ok_or_else(|| StorageError::InvalidFormat {
                    path: self.persistence.data_file().to_path_buf(),
                    details: format!("id {} leaves no room for new ids", max_id),
                })?,
            None => 1,
        };

        self.books = books;
        self.next_id = stored_next.max(past_max);
        debug!(
            "Store loaded: {} book(s), next id {}",
            self.books.len(),
            self.next_id
        );
        Ok(())
    }

    /// Write the id counter, then the whole collection, to disk
    ///
    /// The book list is written last, so a failed save leaves it untouched.
    /// `load` takes the larger of the counter and the stored ids.
    pub fn save(&self) -> Result<()> {
        self.persistence.save_next_id(self.next_id)?;
        self.persistence.save_books(&self.books)?;
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All books, in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Id the next added book will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Add a new book and persist; returns its id
    pub fn add(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Result<u64> {
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;
        self.books.push(Book::new(id, title, author, year));
        self.next_id = next_id;

        if let Err(e) = self.save() {
            warn!("Rolling back add of book {}: {}", id, e);
            self.books.pop();
            self.next_id = id;
            return Err(e);
        }

        info!("Added book {}", id);
        Ok(id)
    }

    /// Delete a book by id
    ///
    /// Returns `false` (and changes nothing) if no book has that id.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.books.remove(index);
        if let Err(e) = self.save() {
            warn!("Rolling back delete of book {}: {}", id, e);
            self.books.insert(index, removed);
            return Err(e);
        }

        info!("Deleted book {}", id);
        Ok(true)
    }

    /// Get a book by id
    pub fn get_by_id(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Books whose `field` contains `query`, ignoring case, in store order
    pub fn search(&self, query: &str, field: SearchField) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.matches(field, query))
            .cloned()
            .collect()
    }

    /// Search by field name
    ///
    /// Fails with [`Error::InvalidField`] if books have no such field.
    pub fn search_by_name(&self, query: &str, field: &str) -> Result<Vec<Book>> {
        let field: SearchField = field.parse()?;
        Ok(self.search(query, field))
    }

    /// Set a book's status
    ///
    /// Returns `false` (and changes nothing) if no book has that id.
    pub fn update_status(&mut self, id: u64, status: Status) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let previous = std::mem::replace(&mut self.books[index].status, status);
        if let Err(e) = self.save() {
            warn!("Rolling back status change of book {}: {}", id, e);
            self.books[index].status = previous;
            return Err(e);
        }

        info!("Book {} is now {}", id, status);
        Ok(true)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("data_file", &self.persistence.data_file())
            .field("books", &self.books.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
