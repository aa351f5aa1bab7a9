//! JSON file book storage.
//!
//! The whole library lives in memory as an ordered list and is written to
//! a single JSON file only when `save` runs (through `flush` or
//! `end_session`). Between saves the file and the in-memory list may
//! differ. Concurrent writers to the same file are not coordinated; the
//! last save wins.

use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;

use super::{BookRepository, LoadOutcome, StorageBackend};
use crate::{
    error::AppResult,
    models::{book::UNKNOWN_LANGUAGE, Book, LibraryStats, NewBook},
};

pub struct JsonBookRepository {
    path: PathBuf,
    books: RwLock<Vec<Book>>,
}

impl JsonBookRepository {
    /// Empty repository backed by `path`; nothing is read until `load`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: RwLock::new(Vec::new()),
        }
    }

    /// Create a repository and load the library file
    pub async fn open(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let repository = Self::new(path);
        let outcome = repository.load().await;
        (repository, outcome)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory collection with the file contents.
    ///
    /// A missing file gives an empty library. An unreadable or malformed
    /// file also gives an empty library; the cause is logged and returned
    /// as `LoadOutcome::Recovered`, and the file is left untouched until
    /// the next save overwrites it.
    pub async fn load(&self) -> LoadOutcome {
        let (books, outcome) = match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<Book>>(&bytes) {
                Ok(books) => {
                    let count = books.len();
                    (books, LoadOutcome::Loaded { count })
                }
                Err(e) => {
                    tracing::warn!(
                        "Library file {} is malformed, starting empty: {}",
                        self.path.display(),
                        e
                    );
                    (Vec::new(), LoadOutcome::Recovered { reason: e.to_string() })
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (Vec::new(), LoadOutcome::Missing),
            Err(e) => {
                tracing::warn!(
                    "Library file {} is unreadable, starting empty: {}",
                    self.path.display(),
                    e
                );
                (Vec::new(), LoadOutcome::Recovered { reason: e.to_string() })
            }
        };

        *self.books.write().await = books;
        outcome
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Overwrite the library file with the in-memory collection
    pub async fn save(&self) -> AppResult<()> {
        let json = {
            let books = self.books.read().await;
            serde_json::to_vec_pretty(&*books)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename over it so the file is never half written
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!("Saved library to {}", self.path.display());
        Ok(())
    }

    /// Empty the in-memory collection without touching the file
    pub async fn clear(&self) {
        self.books.write().await.clear();
    }
}

#[async_trait]
impl BookRepository for JsonBookRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::JsonFile
    }

    async fn add(&self, mut book: NewBook) -> AppResult<Book> {
        if book.language.is_none() {
            book.language = Some(UNKNOWN_LANGUAGE.to_string());
        }
        let book = book.into_book(None);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn remove(&self, title: &str) -> AppResult<bool> {
        let title = title.to_lowercase();
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| b.title.to_lowercase() != title);
        Ok(books.len() < before)
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let keyword = keyword.to_lowercase();
        let books = self.books.read().await;
        Ok(books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&keyword)
                    || b.author.to_lowercase().contains(&keyword)
            })
            .cloned()
            .map(Book::with_default_language)
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().cloned().map(Book::with_default_language).collect())
    }

    async fn statistics(&self) -> AppResult<LibraryStats> {
        let books = self.list_all().await?;
        Ok(LibraryStats::from_books(&books))
    }

    async fn flush(&self) -> AppResult<()> {
        self.save().await
    }

    async fn discard(&self, book: &Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        if let Some(index) = books.iter().rposition(|b| b == book) {
            books.remove(index);
        }
        Ok(())
    }

    async fn reload(&self) -> AppResult<LoadOutcome> {
        Ok(self.load().await)
    }

    async fn end_session(&self) -> AppResult<()> {
        self.save().await?;
        self.clear().await;
        Ok(())
    }
}
