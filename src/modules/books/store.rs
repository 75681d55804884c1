//! Persistence for the `books` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_db::DbPool;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, BookInput, BookStatus};

/// Column list for `books` queries.
const COLUMNS: &str = "id, title, author, genre, status, rating, notes, created_at, updated_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// A stored row no longer maps onto a [`Book`].
    #[error("corrupt book row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Create, read, update, delete and list book records.
///
/// Every mutation touches exactly one row.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new record with a generated id and timestamps.
    async fn create(&self, input: &BookInput) -> Result<Book, StoreError>;

    async fn read(&self, id: &str) -> Result<Book, StoreError>;

    /// Replace every mutable field; `created_at` is kept, `updated_at` refreshed.
    async fn update(&self, id: &str, input: &BookInput) -> Result<Book, StoreError>;

    /// Permanently remove the record. Deleting twice reports `NotFound`.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// All records, most recently created first.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;
}

/// A row from the `books` table.
#[derive(Debug, FromRow)]
struct BookRow {
    id: String,
    title: String,
    author: String,
    genre: Option<String>,
    status: Option<String>,
    rating: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookRow {
    fn into_book(self) -> Result<Book, StoreError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<BookStatus>)
            .transpose()
            .map_err(|err| StoreError::Corrupt {
                id: self.id.clone(),
                reason: err.to_string(),
            })?;

        let rating = self
            .rating
            .map(u8::try_from)
            .transpose()
            .map_err(|_| StoreError::Corrupt {
                id: self.id.clone(),
                reason: format!("rating {:?} is not a valid rating", self.rating),
            })?;

        Ok(Book {
            id: self.id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            status,
            rating,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SQLite-backed [`BookStore`].
#[derive(Clone)]
pub struct SqlBookStore {
    pool: DbPool,
}

impl SqlBookStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqlBookStore {
    async fn create(&self, input: &BookInput) -> Result<Book, StoreError> {
        let id = Uuid::now_v7().to_string();
        let now = Utc::now();

        let query = format!(
            "INSERT INTO books \
                (id, title, author, genre, status, rating, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(&id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.genre)
            .bind(input.status.map(BookStatus::as_str))
            .bind(input.rating.map(i64::from))
            .bind(&input.notes)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        row.into_book()
    }

    async fn read(&self, id: &str) -> Result<Book, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = ?");
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .into_book()
    }

    async fn update(&self, id: &str, input: &BookInput) -> Result<Book, StoreError> {
        let query = format!(
            "UPDATE books SET \
                title = ?, author = ?, genre = ?, status = ?, rating = ?, notes = ?, \
                updated_at = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.genre)
            .bind(input.status.map(BookStatus::as_str))
            .bind(input.rating.map(i64::from))
            .bind(&input.notes)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .into_book()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        // rowid breaks ties between rows created within the same clock tick
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY created_at DESC, rowid DESC");
        sqlx::query_as::<_, BookRow>(&query)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(BookRow::into_book)
            .collect()
    }
}
