//! In-process book table: insertion-ordered rows, unique index on title.
//!
//! This is the sole shared resource; every method takes the lock for the
//! duration of one operation, so each request observes a consistent snapshot
//! and mutations are atomic from the caller's view.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use time::OffsetDateTime;

use super::models::{Book, BookPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a book with title '{0}' already exists")]
    DuplicateTitle(String),
    #[error("book store lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

/// Cloneable handle to the shared book table.
#[derive(Debug, Clone, Default)]
pub struct BookStore {
    rows: Arc<RwLock<Vec<Book>>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One page of books in insertion (creation) order, plus the total count.
    pub fn page(&self, page: u64, per_page: u64) -> Result<(Vec<Book>, u64), StoreError> {
        let rows = self.rows.read()?;
        let total = rows.len() as u64;
        let start = (page.saturating_sub(1)).saturating_mul(per_page) as usize;
        let items = rows
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    pub fn get(&self, id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.rows.read()?.iter().find(|b| b.id == id).cloned())
    }

    /// Whether any stored book already uses exactly this title.
    pub fn title_taken(&self, title: &str) -> Result<bool, StoreError> {
        Ok(self.rows.read()?.iter().any(|b| b.title == title))
    }

    /// Insert a new book. The unique-title check runs under the write lock
    /// and is the authoritative backstop against racing creates; the
    /// validation-time check is only a best-effort pre-check.
    pub fn insert(&self, book: Book) -> Result<Book, StoreError> {
        let mut rows = self.rows.write()?;
        if rows.iter().any(|b| b.title == book.title) {
            return Err(StoreError::DuplicateTitle(book.title));
        }
        rows.push(book.clone());
        Ok(book)
    }

    /// Merge the supplied fields onto an existing record and refresh
    /// `updated_at`. Title uniqueness is not re-checked here. Returns
    /// `Ok(None)` when no record has this id.
    pub fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StoreError> {
        let mut rows = self.rows.write()?;
        let Some(book) = rows.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(published_date) = patch.published_date {
            book.published_date = published_date;
        }
        if let Some(genre) = patch.genre {
            book.genre = genre;
        }
        if let Some(publisher) = patch.publisher {
            book.publisher = Some(publisher);
        }
        book.updated_at = OffsetDateTime::now_utc();

        Ok(Some(book.clone()))
    }

    /// Hard delete. Returns the removed record, or `Ok(None)` on a miss.
    pub fn remove(&self, id: &str) -> Result<Option<Book>, StoreError> {
        let mut rows = self.rows.write()?;
        let Some(position) = rows.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        Ok(Some(rows.remove(position)))
    }
}
