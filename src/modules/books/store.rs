use anyhow::Context;
use sqlx::SqlitePool;

use biblio_db::Database;

use super::models::{Book, NewBook};

/// Data access for the `books` table. Cheap to clone; handlers hold one
/// as router state.
#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, book: &NewBook) -> anyhow::Result<Book> {
        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (name, author, year_published, book_type)
             VALUES (?, ?, ?, ?)
             RETURNING id, name, author, year_published, book_type",
        )
        .bind(&book.name)
        .bind(&book.author)
        .bind(book.year_published)
        .bind(book.book_type.as_str())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert book")?;

        Ok(created)
    }

    /// All books in storage (insertion) order.
    pub async fn list(&self) -> anyhow::Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, name, author, year_published, book_type FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list books")?;

        Ok(books)
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, name, author, year_published, book_type FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch book")?;

        Ok(book)
    }

    /// First book with exactly this name, if any. Names are not unique;
    /// the lowest id wins.
    pub async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, name, author, year_published, book_type
             FROM books WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch book by name")?;

        Ok(book)
    }

    /// Full replace of the mutable fields. Returns false when no row has
    /// this id.
    pub async fn update(&self, id: i64, book: &NewBook) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE books SET name = ?, author = ?, year_published = ?, book_type = ?
             WHERE id = ?",
        )
        .bind(&book.name)
        .bind(&book.author)
        .bind(book.year_published)
        .bind(book.book_type.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update book")?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no row has this id.
    pub async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete book")?;

        Ok(result.rows_affected() > 0)
    }
}
