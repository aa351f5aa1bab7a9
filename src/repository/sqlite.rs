//! SQLite book storage.
//!
//! One `books` table. Every call opens its own connection and closes it
//! before returning; there is no pool and no statement spans more than one
//! call. Title matching for remove/update is exact, search goes through
//! `LIKE` and so is ASCII case-insensitive.

use async_trait::async_trait;
use sqlx::{
    sqlite::SqliteConnectOptions, ConnectOptions, Connection, SqliteConnection,
};
use std::str::FromStr;

use super::{BookRepository, LoadOutcome, StorageBackend};
use crate::{
    error::AppResult,
    models::{
        stats::{StatEntry, TOP_N},
        Book, BookUpdate, LibraryStats, NewBook,
    },
};

const BOOK_COLUMNS: &str = "id, title, author, year, genre, language, read_status";

#[derive(Clone)]
pub struct SqliteBookRepository {
    options: SqliteConnectOptions,
}

impl SqliteBookRepository {
    pub fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Ok(Self { options })
    }

    async fn connect(&self) -> AppResult<SqliteConnection> {
        Ok(self.options.connect().await?)
    }

    /// Create the books table if it does not exist yet
    pub async fn initialize(&self) -> AppResult<()> {
        let mut conn = self.connect().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                year INTEGER,
                genre TEXT,
                language TEXT,
                read_status BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&mut conn)
        .await?;
        conn.close().await?;
        Ok(())
    }

    async fn top_entries(conn: &mut SqliteConnection, column: &str) -> AppResult<Vec<StatEntry>> {
        let query = format!(
            "SELECT {column} AS label, COUNT(*) AS value FROM books \
             GROUP BY {column} ORDER BY value DESC, label ASC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, StatEntry>(&query)
            .bind(TOP_N as i64)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }
}

/// `LIKE` pattern matching `keyword` literally anywhere in the value
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    async fn add(&self, book: NewBook) -> AppResult<Book> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, year, genre, language, read_status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(&book.genre)
        .bind(&book.language)
        .bind(book.read_status)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        Ok(book.into_book(Some(result.last_insert_rowid())))
    }

    async fn remove(&self, title: &str) -> AppResult<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM books WHERE title = ?")
            .bind(title)
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, title: &str, changes: &BookUpdate) -> AppResult<u64> {
        let mut conn = self.connect().await?;

        if changes.is_empty() {
            let matched: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title = ?")
                .bind(title)
                .fetch_one(&mut conn)
                .await?;
            conn.close().await?;
            return Ok(matched as u64);
        }

        let mut sets = Vec::new();
        if changes.read_status.is_some() {
            sets.push("read_status = ?");
        }
        if changes.genre.is_some() {
            sets.push("genre = ?");
        }
        let statement = format!("UPDATE books SET {} WHERE title = ?", sets.join(", "));

        let mut query = sqlx::query(&statement);
        if let Some(read_status) = changes.read_status {
            query = query.bind(read_status);
        }
        if let Some(ref genre) = changes.genre {
            query = query.bind(genre);
        }
        let result = query.bind(title).execute(&mut conn).await?;
        conn.close().await?;

        Ok(result.rows_affected())
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let pattern = like_pattern(keyword);
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, Book>(&format!(
            r"SELECT {BOOK_COLUMNS} FROM books
              WHERE title LIKE ? ESCAPE '\' OR author LIKE ? ESCAPE '\'
              ORDER BY id"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(rows)
    }

    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;
        Ok(rows)
    }

    async fn statistics(&self) -> AppResult<LibraryStats> {
        let mut conn = self.connect().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut conn)
            .await?;
        let read: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE read_status = 1")
            .fetch_one(&mut conn)
            .await?;
        let top_genres = Self::top_entries(&mut conn, "genre").await?;
        let top_languages = Self::top_entries(&mut conn, "language").await?;

        conn.close().await?;
        Ok(LibraryStats::from_counts(total, read, top_genres, top_languages))
    }

    async fn reload(&self) -> AppResult<LoadOutcome> {
        self.initialize().await?;
        Ok(LoadOutcome::Ready)
    }
}
