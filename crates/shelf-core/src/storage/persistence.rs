//! JSON file persistence
//!
//! Handles saving and loading the book list to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Files:
//! - `<data_file>` - JSON array of books, pretty-printed, UTF-8
//! - `<data_file>.seq` - The next id to hand out

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::models::Book;
use crate::storage::error::{StorageError, StorageResult};

const INDENT: &[u8] = b"    ";

/// Persistence layer for the book list
///
/// The whole list is rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonPersistence {
    data_file: PathBuf,
    counter_file: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the data file named in `config`
    pub fn new(config: &Config) -> Self {
        Self {
            data_file: config.data_file.clone(),
            counter_file: config.counter_path(),
        }
    }

    /// Path of the book list
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Load every book, in stored order
    ///
    /// A missing file is an empty list. A file that exists but is not a
    /// list of well-formed books is an error; nothing is partially loaded.
    pub fn load_books(&self) -> StorageResult<Vec<Book>> {
        let bytes = match fs::read(&self.data_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No data file at {:?}, starting empty", self.data_file);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::from_read(e, self.data_file.clone())),
        };

        let books = decode_books(&self.data_file, &bytes)?;
        debug!("Loaded {} book(s) from {:?}", books.len(), self.data_file);
        Ok(books)
    }

    /// Overwrite the data file with `books`
    pub fn save_books(&self, books: &[Book]) -> StorageResult<()> {
        let bytes = encode_books(books)?;
        atomic_write(&self.data_file, &bytes)?;
        debug!("Saved {} book(s) to {:?}", books.len(), self.data_file);
        Ok(())
    }

    /// Load the persisted id counter
    ///
    /// Returns `None` if the counter file doesn't exist.
    pub fn load_next_id(&self) -> StorageResult<Option<u64>> {
        let content = match fs::read_to_string(&self.counter_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_read(e, self.counter_file.clone())),
        };

        let next_id = content
            .trim()
            .parse::<u64>()
            .map_err(|e| StorageError::InvalidCounter {
                path: self.counter_file.clone(),
                details: e.to_string(),
            })?;

        Ok(Some(next_id))
    }

    /// Persist the id counter
    pub fn save_next_id(&self, next_id: u64) -> StorageResult<()> {
        atomic_write(&self.counter_file, format!("{}\n", next_id).as_bytes())
    }
}

/// Serialize books as a pretty JSON array with 4-space indentation
///
/// Non-ASCII text is written as-is.
fn encode_books(books: &[Book]) -> StorageResult<Vec<u8>> {
    let records: Vec<Value> = books
        .iter()
        .map(|book| Value::Object(book.to_mapping()))
        .collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Parse a JSON array of book mappings
fn decode_books(path: &Path, bytes: &[u8]) -> StorageResult<Vec<Book>> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::InvalidFormat {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Book::from_mapping(record).map_err(|e| StorageError::InvalidFormat {
                path: path.to_path_buf(),
                details: format!("record {}: {}", index + 1, e),
            })
        })
        .collect()
}

/// Sibling path used while writing `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("shelf"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::from_io(e, temp_path));
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
