//! The book listing store.
//!
//! All listings live as one JSON array under a single storage key. Every
//! mutation re-reads that array, changes it, and writes the whole array back.
//! Because the backend has no transaction spanning the read and the write,
//! mutations are funnelled through a single-writer queue: one
//! read-modify-write is in flight at a time and overlapping callers wait
//! their turn, in arrival order, so a rapid double submit cannot lose a
//! listing or reorder it.

use std::sync::{Condvar, Mutex, PoisonError};

use log::{info, warn};

use crate::book_record::BookRecord;
use crate::storage::{KeyValueStorage, LmdbStorage};
use crate::store_config::{StoreConfig, ValidationMode};
use crate::store_error::{BookStoreError, Result};

pub struct BookStore<S: KeyValueStorage = LmdbStorage> {
    storage: S,
    storage_key: String,
    validation: ValidationMode,
    allowed_universities: Vec<String>,
    write_queue: WriteQueue,
}

impl BookStore<LmdbStorage> {
    /// Opens the on-device store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BookStoreError::StorageRead`] if the LMDB environment can't
    /// be created or opened.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let storage = LmdbStorage::open(config).map_err(BookStoreError::StorageRead)?;
        Ok(Self::with_storage(storage, config))
    }
}

impl<S: KeyValueStorage> BookStore<S> {
    pub fn with_storage(storage: S, config: &StoreConfig) -> Self {
        Self {
            storage,
            storage_key: config.storage_key.clone(),
            validation: config.validation,
            allowed_universities: config.allowed_universities.clone(),
            write_queue: WriteQueue::new(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Reads every listing, in insertion order.
    ///
    /// A key that was never written yields an empty list.
    ///
    /// # Errors
    ///
    /// * [`BookStoreError::StorageRead`] if the backend fails.
    /// * [`BookStoreError::DataCorruption`] if the stored value is not a JSON
    ///   array of books.
    pub fn load(&self) -> Result<Vec<BookRecord>> {
        let raw = self
            .storage
            .get(&self.storage_key)
            .map_err(BookStoreError::StorageRead)?;

        let Some(bytes) = raw else {
            info!("No books stored under '{}' yet", self.storage_key);
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<Vec<BookRecord>>(&bytes) {
            Ok(books) => Ok(books),
            Err(e) => {
                warn!("Stored value under '{}' is not a book list: {e}", self.storage_key);
                Err(BookStoreError::DataCorruption(format!(
                    "value under '{}' is not a book list: {e}",
                    self.storage_key
                )))
            }
        }
    }

    /// Adds `record` at the end of the list and returns the new list.
    ///
    /// # Errors
    ///
    /// * [`BookStoreError::Validation`] in strict mode when a required field
    ///   is empty, or the university is outside a configured allow-list.
    ///   Storage is not touched.
    /// * Any error from [`load`](Self::load).
    /// * [`BookStoreError::StorageWrite`] if the write fails; the persisted
    ///   list is then unchanged.
    pub fn append(&self, record: BookRecord) -> Result<Vec<BookRecord>> {
        self.validate(&record)?;

        let title = record.book_title.clone();
        let books = self.mutate(|books| books.push(record))?;
        info!("Appended '{title}', {} books stored", books.len());
        Ok(books)
    }

    /// Removes every listing titled exactly `title` and returns the new list.
    ///
    /// The list is written back even when nothing matched.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append), minus validation.
    pub fn remove(&self, title: &str) -> Result<Vec<BookRecord>> {
        let mut removed = 0;
        let books = self.mutate(|books| {
            let before = books.len();
            books.retain(|book| book.book_title != title);
            removed = before - books.len();
        })?;

        if removed == 0 {
            info!("No books titled '{title}' to remove");
        } else {
            info!("Removed {removed} book(s) titled '{title}', {} left", books.len());
        }
        Ok(books)
    }

    /// Checks `record` against the configured [`ValidationMode`].
    pub fn validate(&self, record: &BookRecord) -> Result<()> {
        if self.validation == ValidationMode::Lenient {
            return Ok(());
        }

        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(BookStoreError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !record.university_allowed(&self.allowed_universities) {
            return Err(BookStoreError::Validation(format!(
                "Unknown university: {}",
                record.university
            )));
        }

        Ok(())
    }

    fn mutate<F>(&self, change: F) -> Result<Vec<BookRecord>>
    where
        F: FnOnce(&mut Vec<BookRecord>),
    {
        let _turn = self.write_queue.enter();

        let mut books = self.load()?;
        change(&mut books);
        self.persist(&books)?;
        Ok(books)
    }

    fn persist(&self, books: &[BookRecord]) -> Result<()> {
        let json = serde_json::to_vec(books)
            .map_err(|e| BookStoreError::StorageWrite(e.into()))?;

        self.storage
            .set(&self.storage_key, &json)
            .map_err(|e| {
                warn!("Failed to write books under '{}': {e}", self.storage_key);
                BookStoreError::StorageWrite(e)
            })
    }
}

/// Ticket lock serving writers strictly in the order they called `enter`.
struct WriteQueue {
    tickets: Mutex<Tickets>,
    turn: Condvar,
}

#[derive(Default)]
struct Tickets {
    next: u64,
    serving: u64,
}

/// Held while a mutation runs; passes the turn on when dropped, panics included.
struct Turn<'a> {
    queue: &'a WriteQueue,
}

impl WriteQueue {
    fn new() -> Self {
        Self {
            tickets: Mutex::new(Tickets::default()),
            turn: Condvar::new(),
        }
    }

    fn enter(&self) -> Turn<'_> {
        // The counters stay consistent under poisoning, so keep going.
        let mut tickets = self.tickets.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = tickets.next;
        tickets.next = tickets.next.wrapping_add(1);

        while tickets.serving != ticket {
            tickets = self.turn.wait(tickets).unwrap_or_else(PoisonError::into_inner);
        }
        Turn { queue: self }
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        let mut tickets = self.queue.tickets.lock().unwrap_or_else(PoisonError::into_inner);
        tickets.serving = tickets.serving.wrapping_add(1);
        drop(tickets);
        self.queue.turn.notify_all();
    }
}
