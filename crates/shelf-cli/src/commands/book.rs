//! Book command handlers

use anyhow::{bail, Context, Result};

use shelf_core::{Catalog, SearchField, Status};

use crate::output::Output;
use crate::prompt::confirm;

/// Add a new book
pub fn add(
    catalog: &mut Catalog,
    title: String,
    author: String,
    year: i32,
    output: &Output,
) -> Result<()> {
    let title = title.trim();
    let author = author.trim();
    if title.is_empty() {
        bail!("Title cannot be empty");
    }
    if author.is_empty() {
        bail!("Author cannot be empty");
    }

    let id = catalog
        .add(title, author, year)
        .context("Failed to add book")?;

    output.success(&format!("Added book {}", id));
    if let Some(book) = catalog.get(id) {
        output.print_book(book)?;
    }

    Ok(())
}

/// List every book
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    output.print_books(catalog.books())
}

/// Show a single book
pub fn show(catalog: &Catalog, id: u64, output: &Output) -> Result<()> {
    let book = catalog
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    output.print_book(book)
}

/// Delete a book
pub fn delete(catalog: &mut Catalog, id: u64, yes: bool, output: &Output) -> Result<()> {
    let book = catalog
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() && !yes {
        println!("Delete book: {} - {}", book.id, book.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !catalog.delete(id).context("Failed to delete book")? {
        bail!("Book not found: {}", id);
    }

    output.success(&format!("Deleted book {}", id));

    Ok(())
}

/// Search books by one of the configured fields
pub fn search(catalog: &Catalog, field: String, query: String, output: &Output) -> Result<()> {
    let parsed: SearchField = field.parse()?;
    if !catalog.search_fields().contains(&parsed) {
        bail!(
            "Searching by '{}' is not enabled. Enabled fields: {}",
            parsed,
            shelf_core::models::join_fields(catalog.search_fields())
        );
    }

    let books = catalog.search(&query, parsed.as_str())?;
    output.print_books(&books)
}

/// Change a book's status
pub fn set_status(catalog: &mut Catalog, id: u64, status: String, output: &Output) -> Result<()> {
    let status: Status = status.parse()?;

    if !catalog
        .update_status(id, status)
        .context("Failed to update status")?
    {
        bail!("Book not found: {}", id);
    }

    output.success(&format!("Book {} is now {}", id, status));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use shelf_core::Config;
    use tempfile::TempDir;

    fn test_catalog(temp_dir: &TempDir) -> Catalog {
        let config = Config {
            data_file: temp_dir.path().join("library.json"),
            ..Config::default()
        };
        Catalog::open(config).unwrap()
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = test_catalog(&temp_dir);

        add(&mut catalog, "  Dune ".into(), "Herbert".into(), 1965, &quiet()).unwrap();
        assert_eq!(catalog.get(1).unwrap().title, "Dune");

        assert!(add(&mut catalog, " ".into(), "Herbert".into(), 1965, &quiet()).is_err());
        assert!(add(&mut catalog, "Dune".into(), "".into(), 1965, &quiet()).is_err());
        assert_eq!(catalog.books().len(), 1);
    }

    #[test]
    fn test_show_unknown_book_fails() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = test_catalog(&temp_dir);

        let err = show(&catalog, 3, &quiet()).unwrap_err();
        assert!(err.to_string().contains("Book not found: 3"));
    }

    #[test]
    fn test_delete_without_prompt_in_quiet_mode() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = test_catalog(&temp_dir);
        catalog.add("Dune", "Herbert", 1965).unwrap();

        delete(&mut catalog, 1, false, &quiet()).unwrap();
        assert!(catalog.get(1).is_none());
        assert!(delete(&mut catalog, 1, true, &quiet()).is_err());
    }

    #[test]
    fn test_search_requires_enabled_field() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = test_catalog(&temp_dir);
        catalog.add("Dune", "Herbert", 1965).unwrap();

        search(&catalog, "title".into(), "dune".into(), &quiet()).unwrap();

        let err = search(&catalog, "status".into(), "in".into(), &quiet()).unwrap_err();
        assert!(err.to_string().contains("not enabled"));

        let err = search(&catalog, "isbn".into(), "1".into(), &quiet()).unwrap_err();
        assert!(err.to_string().contains("Invalid search field"));
    }

    #[test]
    fn test_set_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = test_catalog(&temp_dir);
        catalog.add("Dune", "Herbert", 1965).unwrap();

        set_status(&mut catalog, 1, "checked-out".into(), &quiet()).unwrap();
        assert_eq!(catalog.get(1).unwrap().status, Status::CheckedOut);

        assert!(set_status(&mut catalog, 1, "missing".into(), &quiet()).is_err());
        assert!(set_status(&mut catalog, 9, "in stock".into(), &quiet()).is_err());
    }
}
