//! Library service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{book::UpdateBookRequest, Book, CreateBook, LibraryStats},
    repository::{BookRepository, LoadOutcome, StorageBackend},
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Arc<dyn BookRepository>,
    autosave: bool,
}

impl LibraryService {
    /// `autosave` persists after every add and every successful remove
    pub fn new(repository: Arc<dyn BookRepository>, autosave: bool) -> Self {
        Self {
            repository,
            autosave,
        }
    }

    pub fn backend(&self) -> StorageBackend {
        self.repository.backend()
    }

    /// Validate and store a new book
    pub async fn add_book(&self, request: CreateBook) -> AppResult<Book> {
        request.validate()?;
        let book = self.repository.add(request.normalize()).await?;
        tracing::info!("Book '{}' by {} added", book.title, book.author);

        if let Err(e) = self.save_after_change().await {
            self.repository.discard(&book).await?;
            tracing::warn!("Book '{}' not kept, library could not be saved", book.title);
            return Err(e);
        }
        Ok(book)
    }

    /// Remove every book with this title; false if none matched
    pub async fn remove_book(&self, title: &str) -> AppResult<bool> {
        let found = self.repository.remove(title).await?;
        if found {
            tracing::info!("Book '{}' removed", title);
            self.save_after_change().await?;
        } else {
            tracing::info!("No book titled '{}' to remove", title);
        }
        Ok(found)
    }

    /// Update read status and/or genre of every book with the given title
    pub async fn update_book(&self, request: &UpdateBookRequest) -> AppResult<u64> {
        let matched = self.repository.update(&request.title, &request.changes()).await?;
        tracing::info!("Book '{}' updated ({} matching)", request.title, matched);
        Ok(matched)
    }

    pub async fn search_books(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let books = self.repository.search(keyword).await?;
        tracing::debug!("Search '{}' matched {} books", keyword, books.len());
        Ok(books)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.list_all().await
    }

    pub async fn statistics(&self) -> AppResult<LibraryStats> {
        self.repository.statistics().await
    }

    /// Persist the current library explicitly
    pub async fn save(&self) -> AppResult<()> {
        self.repository.flush().await?;
        tracing::info!("Library saved");
        Ok(())
    }

    /// Discard in-memory state and read the library from storage again
    pub async fn reload(&self) -> AppResult<LoadOutcome> {
        let outcome = self.repository.reload().await?;
        tracing::info!("Library reloaded: {:?}", outcome);
        Ok(outcome)
    }

    /// Save and end the session
    pub async fn exit_session(&self) -> AppResult<()> {
        self.repository.end_session().await?;
        tracing::info!("Session ended");
        Ok(())
    }

    async fn save_after_change(&self) -> AppResult<()> {
        if self.autosave {
            self.repository.flush().await?;
        }
        Ok(())
    }
}
