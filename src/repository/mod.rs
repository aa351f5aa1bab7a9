//! Repository layer: the book operation contract and its storage backends

pub mod json_file;
pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    config::{BackendKind, StorageConfig},
    error::{AppError, AppResult},
    models::{Book, BookUpdate, LibraryStats, NewBook},
};

pub use json_file::JsonBookRepository;
pub use sqlite::SqliteBookRepository;

/// Storage strategy behind a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Sqlite,
    JsonFile,
}

/// Result of (re)loading a backend's persisted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nothing to load; storage is queried per call
    Ready,
    /// Collection read from the library file
    Loaded { count: usize },
    /// No library file yet; collection starts empty
    Missing,
    /// Library file unreadable; collection reset to empty
    Recovered { reason: String },
}

/// Operations every storage backend provides.
///
/// `remove` never fails because a title is absent, it reports whether
/// anything matched instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// Store a new book and return it as stored
    async fn add(&self, book: NewBook) -> AppResult<Book>;

    /// Remove every book with this title; true if at least one matched
    async fn remove(&self, title: &str) -> AppResult<bool>;

    /// Apply `changes` to every book with this title, returning how many matched
    async fn update(&self, _title: &str, _changes: &BookUpdate) -> AppResult<u64> {
        Err(AppError::Unsupported(format!(
            "{:?} storage does not support updating books",
            self.backend()
        )))
    }

    /// Books whose title or author contains `keyword`
    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>>;

    async fn list_all(&self) -> AppResult<Vec<Book>>;

    async fn statistics(&self) -> AppResult<LibraryStats>;

    /// Persist in-memory state, if the backend keeps any
    async fn flush(&self) -> AppResult<()> {
        Ok(())
    }

    /// Drop a just-added book whose change could not be persisted
    async fn discard(&self, _book: &Book) -> AppResult<()> {
        Ok(())
    }

    /// Re-read persisted state
    async fn reload(&self) -> AppResult<LoadOutcome>;

    /// Persist and drop session state
    async fn end_session(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Open the configured backend and load its initial state
pub async fn open(config: &StorageConfig) -> AppResult<(Arc<dyn BookRepository>, LoadOutcome)> {
    match config.backend {
        BackendKind::Sqlite => {
            let repository = SqliteBookRepository::new(&config.database_url)?;
            let outcome = repository.reload().await?;
            Ok((Arc::new(repository), outcome))
        }
        BackendKind::Json => {
            let (repository, outcome) = JsonBookRepository::open(&config.json_path).await;
            Ok((Arc::new(repository), outcome))
        }
    }
}
