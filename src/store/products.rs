//! Product catalog records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::Result;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
        category: impl Into<String>,
        stock: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            price,
            image_url: image_url.into(),
            category: category.into(),
            stock,
            created_at: Utc::now(),
        }
    }
}

pub async fn insert(ex: impl PgExecutor<'_>, product: &Product) -> Result<()> {
    sqlx::query(
        "INSERT INTO products (id, name, description, price, image_url, category, stock, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(&product.category)
    .bind(product.stock)
    .bind(product.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find(ex: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(product)
}

/// Escape LIKE metacharacters so the search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// List products, optionally filtered by exact category and a
/// case-insensitive search over name and description. Capped at 100.
pub async fn list(
    ex: impl PgExecutor<'_>,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Product>> {
    let pattern = search.map(|s| format!("%{}%", escape_like(s)));
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products \
         WHERE ($1::text IS NULL OR category = $1) \
           AND ($2::text IS NULL OR name ILIKE $2 OR description ILIKE $2) \
         ORDER BY created_at DESC LIMIT 100",
    )
    .bind(category)
    .bind(pattern)
    .fetch_all(ex)
    .await?;
    Ok(products)
}

pub async fn count(ex: impl PgExecutor<'_>) -> Result<i64> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(ex)
        .await?;
    Ok(total.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
