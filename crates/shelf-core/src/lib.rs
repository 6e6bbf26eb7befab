//! Shelf Core Library
//!
//! This crate provides the core functionality for shelf, a small book
//! catalog kept in a single JSON file.
//!
//! # Architecture
//!
//! - **Store**: the whole catalog lives in memory; every change rewrites
//!   the data file atomically
//! - **Catalog**: thin facade used by the CLI, plus list rendering
//!
//! Lookups and searches are linear scans over the in-memory list.
//!
//! # Quick Start
//!
//! ```text
//! let mut catalog = Catalog::open(Config::load()?)?;
//!
//! let id = catalog.add("Dune", "Frank Herbert", 1965)?;
//! catalog.update_status(id, Status::CheckedOut)?;
//!
//! let hits = catalog.search("herbert", "author")?;
//! println!("{}", catalog.render(Some(&hits)));
//! ```
//!
//! # Modules
//!
//! - `catalog`: Facade and list rendering (main entry point)
//! - `store`: In-memory collection with file-backed persistence
//! - `models`: Book, status and search field types
//! - `storage`: JSON persistence and storage errors
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Book, SearchField, Status};
pub use storage::{JsonPersistence, StorageError};
pub use store::Store;
