//! Library statistics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::book::Book;

/// Number of genres/languages reported in the frequency tables
pub const TOP_N: usize = 5;

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatEntry {
    /// Value counted; `None` groups books without one
    pub label: Option<String>,
    pub value: i64,
}

/// Aggregate counts over the whole library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LibraryStats {
    pub total: i64,
    pub read: i64,
    pub unread: i64,
    /// Share of read books, 0-100; 0 for an empty library
    pub percentage_read: f64,
    /// Most frequent genres, most common first
    pub top_genres: Vec<StatEntry>,
    /// Most frequent languages, most common first
    pub top_languages: Vec<StatEntry>,
}

impl LibraryStats {
    pub fn from_counts(
        total: i64,
        read: i64,
        top_genres: Vec<StatEntry>,
        top_languages: Vec<StatEntry>,
    ) -> Self {
        let percentage_read = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };
        Self {
            total,
            read,
            unread: total - read,
            percentage_read,
            top_genres,
            top_languages,
        }
    }

    /// Compute statistics over an in-memory collection
    pub fn from_books(books: &[Book]) -> Self {
        let read = books.iter().filter(|b| b.read_status).count() as i64;
        Self::from_counts(
            books.len() as i64,
            read,
            top_entries(books.iter().map(|b| b.genre.as_deref())),
            top_entries(books.iter().map(|b| b.language.as_deref())),
        )
    }
}

/// Count occurrences, most frequent first, ties by label, at most `TOP_N`
fn top_entries<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<StatEntry> {
    let mut counts: HashMap<Option<&str>, i64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut entries: Vec<StatEntry> = counts
        .into_iter()
        .map(|(label, value)| StatEntry {
            label: label.map(str::to_string),
            value,
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    entries.truncate(TOP_N);
    entries
}
