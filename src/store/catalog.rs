use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use tracing::{debug, info, warn};

use super::StoreError;
use crate::model::{
    format_issued_at, is_minute_aligned, parse_issued_at, truncate_to_minute, BookRecord,
    BookStatus, Category, NewBook,
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS books (
    book_id TEXT PRIMARY KEY,
    title TEXT,
    author TEXT,
    category TEXT,
    status TEXT,
    borrower TEXT,
    date_issued TEXT
);";

const SELECT_BOOKS: &str =
    "SELECT book_id, title, author, category, status, borrower, date_issued FROM books";

/// Handle to the `books` table of a catalog file.
///
/// Every mutation runs in its own transaction; reads always hit the file.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened catalog");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Takes the write lock up front so a read-then-write never has to
    /// upgrade it mid-transaction.
    fn write_tx(&mut self) -> rusqlite::Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
    }

    pub fn create(&mut self, book: &NewBook) -> Result<(), StoreError> {
        if book.id.trim().is_empty() {
            return Err(StoreError::Validation("book id must not be empty".to_string()));
        }
        if book.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".to_string()));
        }

        let tx = self.write_tx()?;
        let inserted = tx.execute(
            "INSERT INTO books (book_id, title, author, category, status, borrower, date_issued)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL)",
            params![
                book.id,
                book.title,
                book.author,
                book.category,
                BookStatus::Available
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_duplicate_key(&e) => {
                warn!(id = %book.id, "rejected duplicate book id");
                return Err(StoreError::DuplicateId(book.id.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit()?;
        debug!(id = %book.id, title = %book.title, "added book");
        Ok(())
    }

    /// All books in insertion order.
    pub fn list_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY rowid ASC", SELECT_BOOKS))?;
        let books: rusqlite::Result<Vec<BookRecord>> =
            stmt.query_map([], book_from_row)?.collect();
        Ok(books?)
    }

    pub fn get(&self, id: &str) -> Result<Option<BookRecord>, StoreError> {
        let book = self
            .conn
            .query_row(
                &format!("{} WHERE book_id = ?1", SELECT_BOOKS),
                [id],
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    /// Overwrites the status triple of one book.
    ///
    /// `Issued` needs a non-empty borrower and a minute-aligned timestamp;
    /// `Available` needs neither.
    pub fn set_status(
        &mut self,
        id: &str,
        status: BookStatus,
        borrower: Option<&str>,
        issued_at: Option<NaiveDateTime>,
    ) -> Result<(), StoreError> {
        validate_status(status, borrower, issued_at)?;

        let tx = self.write_tx()?;
        let changed = update_status(&tx, id, status, borrower, issued_at)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.commit()?;
        debug!(id, %status, "updated status");
        Ok(())
    }

    /// Lends an available book. `issued_at` is cut down to the minute; the
    /// stored value is returned.
    pub fn issue(
        &mut self,
        id: &str,
        borrower: &str,
        issued_at: NaiveDateTime,
    ) -> Result<NaiveDateTime, StoreError> {
        let issued_at = truncate_to_minute(issued_at);
        self.transition(id, BookStatus::Issued, Some(borrower), Some(issued_at))?;
        Ok(issued_at)
    }

    pub fn return_book(&mut self, id: &str) -> Result<(), StoreError> {
        self.transition(id, BookStatus::Available, None, None)
    }

    fn transition(
        &mut self,
        id: &str,
        to: BookStatus,
        borrower: Option<&str>,
        issued_at: Option<NaiveDateTime>,
    ) -> Result<(), StoreError> {
        validate_status(to, borrower, issued_at)?;

        let tx = self.write_tx()?;
        let current: Option<BookStatus> = tx
            .query_row("SELECT status FROM books WHERE book_id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        match current {
            None => return Err(StoreError::NotFound(id.to_string())),
            Some(status) if status == to => {
                warn!(id, %status, "status transition rejected");
                return Err(StoreError::InvalidTransition {
                    id: id.to_string(),
                    status,
                });
            }
            Some(_) => {}
        }
        update_status(&tx, id, to, borrower, issued_at)?;
        tx.commit()?;
        debug!(id, status = %to, "status transition applied");
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let tx = self.write_tx()?;
        let removed = tx.execute("DELETE FROM books WHERE book_id = ?1", [id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.commit()?;
        debug!(id, "deleted book");
        Ok(())
    }
}

fn validate_status(
    status: BookStatus,
    borrower: Option<&str>,
    issued_at: Option<NaiveDateTime>,
) -> Result<(), StoreError> {
    match status {
        BookStatus::Issued => {
            if borrower.map_or(true, |b| b.trim().is_empty()) {
                return Err(StoreError::Validation(
                    "an issued book needs a borrower".to_string(),
                ));
            }
            match issued_at {
                None => {
                    return Err(StoreError::Validation(
                        "an issued book needs an issue time".to_string(),
                    ))
                }
                Some(ts) if !is_minute_aligned(&ts) => {
                    return Err(StoreError::Validation(format!(
                        "issue time {} has seconds; only minutes are stored",
                        ts
                    )))
                }
                Some(_) => {}
            }
        }
        BookStatus::Available => {
            if borrower.is_some() || issued_at.is_some() {
                return Err(StoreError::Validation(
                    "an available book cannot have a borrower or issue time".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn update_status(
    conn: &Connection,
    id: &str,
    status: BookStatus,
    borrower: Option<&str>,
    issued_at: Option<NaiveDateTime>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE books SET status = ?1, borrower = ?2, date_issued = ?3 WHERE book_id = ?4",
        params![
            status,
            borrower,
            issued_at.as_ref().map(format_issued_at),
            id
        ],
    )
}

fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<BookRecord> {
    let author: Option<String> = row.get("author")?;
    let issued_at = row
        .get::<_, Option<String>>("date_issued")?
        .map(|s| parse_issued_at(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(BookRecord {
        id: row.get("book_id")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        author: author.filter(|a| !a.is_empty()),
        category: row
            .get::<_, Option<Category>>("category")?
            .unwrap_or_else(|| Category::Other(String::new())),
        status: row.get("status")?,
        borrower: row.get("borrower")?,
        issued_at,
    })
}
