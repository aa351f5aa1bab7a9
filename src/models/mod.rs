//! Data models for Shelf

pub mod book;
pub mod stats;

// Re-export commonly used types
pub use book::{Book, BookResponse, BookUpdate, CreateBook, NewBook};
pub use stats::{LibraryStats, StatEntry};
