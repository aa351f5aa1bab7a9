//! Business logic services

pub mod library;

use std::sync::Arc;

use crate::{config::StorageConfig, repository::BookRepository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub library: library::LibraryService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Arc<dyn BookRepository>, storage_config: &StorageConfig) -> Self {
        Self {
            library: library::LibraryService::new(repository, storage_config.autosave),
        }
    }
}
