//! Product persistence.
//!
//! [`SqlProductStore`] runs portable `?`-placeholder statements over a
//! [`sqlx::AnyPool`], so the same code serves MySQL and SQLite.

use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use thiserror::Error;

use crate::types::{CreateProductPayload, Product, UpdateProductPayload};

/// Largest page [`SqlProductStore::list`] returns.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// MySQL table definition; also shipped as `migrations/0001_products.sql`.
pub const MYSQL_SCHEMA: &str = include_str!("../migrations/0001_products.sql");

/// SQLite table definition.
pub const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    image_url TEXT NOT NULL DEFAULT '',
    price REAL NOT NULL,
    quantity INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, image_url, price, quantity, CAST(created_at AS CHAR) AS created_at FROM products";

/// Store failures. A missing row is not an error; lookups return `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed the statement.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The driver did not report the id of an inserted row.
    #[error("insert did not return a row id")]
    MissingInsertId,
}

/// Product persistence operations used by the handlers.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a product and returns its id.
    async fn create(&self, product: &CreateProductPayload) -> Result<i64, StoreError>;

    /// Fetches one product.
    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Lists products ordered by id.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, StoreError>;

    /// Overwrites the product with `product.id`.
    async fn update(&self, product: &UpdateProductPayload) -> Result<(), StoreError>;

    /// Deletes a product.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// [`ProductStore`] over a SQL connection pool.
#[derive(Debug, Clone)]
pub struct SqlProductStore {
    pool: AnyPool,
}

impl SqlProductStore {
    /// Wraps an initialized pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Creates the `products` table for `driver` if it does not exist.
    ///
    /// Drivers other than `sqlite` get the MySQL definition.
    pub async fn ensure_schema(&self, driver: &str) -> Result<(), StoreError> {
        let schema = if driver.eq_ignore_ascii_case("sqlite") {
            SQLITE_SCHEMA
        } else {
            MYSQL_SCHEMA
        };
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for SqlProductStore {
    async fn create(&self, product: &CreateProductPayload) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO products (name, description, image_url, price, quantity) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.name.as_str())
        .bind(product.description.as_str())
        .bind(product.image_url.as_str())
        .bind(product.price)
        .bind(product.quantity)
        .execute(&self.pool)
        .await?;

        result.last_insert_id().ok_or(StoreError::MissingInsertId)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? LIMIT 1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, StoreError> {
        let limit = if limit <= 0 || limit > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            limit
        };

        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id ASC LIMIT ? OFFSET ?"))
            .bind(limit)
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn update(&self, product: &UpdateProductPayload) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE products SET name = ?, description = ?, image_url = ?, price = ?, quantity = ? WHERE id = ?",
        )
        .bind(product.name.as_str())
        .bind(product.description.as_str())
        .bind(product.image_url.as_str())
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn product_from_row(row: &AnyRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
        created_at: row.try_get("created_at")?,
    })
}
