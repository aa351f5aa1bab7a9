//! Book model and request/response types.
//!
//! `Book` is the single record type of the library. The same struct is a
//! SQLite row (`FromRow`) and an element of the JSON library file, so the
//! serialized shape is the file format: `title`, `author`, `year`, `genre`,
//! `language`, `read_status` (and `id` only when the backend assigns one).

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Latest publication year accepted at input time
pub const MAX_YEAR: i32 = 2025;

/// Language stored by the document backend when none is given
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Row id, assigned by the SQLite backend only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub read_status: bool,
}

impl Book {
    /// Display label for the read flag
    pub fn status_label(&self) -> &'static str {
        if self.read_status {
            "Read"
        } else {
            "Unread"
        }
    }

    /// Copy of this book with a missing language reported as "Unknown"
    pub fn with_default_language(mut self) -> Self {
        if self.language.is_none() {
            self.language = Some(UNKNOWN_LANGUAGE.to_string());
        }
        self
    }
}

/// Normalized book ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub read_status: bool,
}

impl NewBook {
    pub fn into_book(self, id: Option<i64>) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            language: self.language,
            read_status: self.read_status,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    /// Publication year (0-2025); defaults to the current year
    #[validate(range(min = 0, max = 2025, message = "Year must be between 0 and 2025"))]
    pub year: Option<i32>,
    /// Free text, e.g. Fiction, Non-Fiction, Fantasy
    pub genre: Option<String>,
    /// Free text, e.g. English, Spanish
    pub language: Option<String>,
    #[serde(default)]
    pub read_status: bool,
}

impl CreateBook {
    /// Resolve defaults and blank optional fields into a storable book.
    /// Call `validate()` first.
    pub fn normalize(self) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
            year: self.year.unwrap_or_else(default_year),
            genre: non_blank(self.genre),
            language: non_blank(self.language),
            read_status: self.read_status,
        }
    }
}

/// Current year, capped at `MAX_YEAR`
pub fn default_year() -> i32 {
    Utc::now().year().min(MAX_YEAR)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fields that can be changed on existing books; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct BookUpdate {
    pub read_status: Option<bool>,
    pub genre: Option<String>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        self.read_status.is_none() && self.genre.is_none()
    }
}

/// Update request: applies to every book with exactly this title
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub title: String,
    pub read_status: Option<bool>,
    pub genre: Option<String>,
}

impl UpdateBookRequest {
    /// A blank genre counts as not given, as it does when adding
    pub fn changes(&self) -> BookUpdate {
        BookUpdate {
            read_status: self.read_status,
            genre: non_blank(self.genre.clone()),
        }
    }
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring matched against title and author
    #[serde(default)]
    pub keyword: String,
}

/// Remove query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RemoveQuery {
    /// Exact title (case rules depend on the storage backend)
    pub title: String,
}

/// Book as returned to clients, with the read flag rendered
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub read_status: bool,
    /// "Read" or "Unread"
    pub status: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let status = book.status_label().to_string();
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            genre: book.genre,
            language: book.language,
            read_status: book.read_status,
            status,
        }
    }
}
