//! Product catalog: listing, lookup, creation, and the idempotent
//! sample-catalog seed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{ApiError, Result};
use crate::store::products::{self, Product};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let items = products::list(
        &state.db,
        params.category.as_deref(),
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(items))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    products::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    #[validate(range(min = 0))]
    pub stock: i32,
}

pub async fn create_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;
    if req.price.is_sign_negative() {
        return Err(ApiError::bad_request("Price must be non-negative"));
    }
    let product = Product::new(
        req.name,
        req.description,
        req.price,
        req.image_url,
        req.category,
        req.stock,
    );
    products::insert(&state.db, &product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// Advisory lock key serializing catalog seed transactions.
const SEED_LOCK_KEY: i64 = 730_021;

/// Seed the catalog with sample products. A non-empty catalog makes
/// this a no-op, so calling it twice never duplicates products.
pub async fn seed_products(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.db.begin().await?;
    // Concurrent seed calls could both see an empty catalog; the lock
    // (released at transaction end) makes them run one at a time.
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::from)?;
    if products::count(&mut *tx).await? > 0 {
        return Ok(Json(seed_reply(None)));
    }
    let catalog = sample_catalog();
    for product in &catalog {
        products::insert(&mut *tx, product).await?;
    }
    tx.commit().await?;
    tracing::info!(count = catalog.len(), "sample catalog seeded");
    Ok(Json(seed_reply(Some(catalog.len()))))
}

/// A first seed and a repeat call answer with distinct messages.
fn seed_reply(inserted: Option<usize>) -> serde_json::Value {
    match inserted {
        Some(n) => serde_json::json!({ "message": format!("Initialized {n} sample products") }),
        None => serde_json::json!({ "message": "Products already initialized" }),
    }
}

fn sample_catalog() -> Vec<Product> {
    vec![
        Product::new(
            "Premium Dental Care Set",
            "Complete oral care solution with professional-grade toothpaste and accessories",
            dec!(29.99),
            "https://images.unsplash.com/photo-1691096673040-1632eb4b0a9d",
            "Health & Beauty",
            50,
        ),
        Product::new(
            "Professional Toothpaste Duo",
            "Twin pack of premium fluoride toothpaste for complete dental protection",
            dec!(19.99),
            "https://images.unsplash.com/photo-1691096673789-ae6a7492fd97",
            "Health & Beauty",
            75,
        ),
        Product::new(
            "Lifestyle Essentials Bundle",
            "Curated collection of daily essentials and wellness products",
            dec!(89.99),
            "https://images.unsplash.com/photo-1691096674326-74cfe19c04cc",
            "Lifestyle",
            30,
        ),
        Product::new(
            "Complete Oral Health Kit",
            "Professional dental care system with advanced whitening formula",
            dec!(45.99),
            "https://images.unsplash.com/photo-1691096674749-29069acd529c",
            "Health & Beauty",
            40,
        ),
        Product::new(
            "Glossier Beauty Collection",
            "Premium cosmetics and skincare products for modern beauty routines",
            dec!(125.00),
            "https://images.unsplash.com/photo-1629198688000-71f23e745b6e",
            "Beauty",
            25,
        ),
        Product::new(
            "Nike Air Performance Sneaker",
            "High-performance athletic footwear with advanced cushioning technology",
            dec!(159.99),
            "https://images.unsplash.com/photo-1542291026-7eec264c27ff",
            "Fashion",
            60,
        ),
        Product::new(
            "Curology Skincare System",
            "Personalized skincare solution with custom formulated treatments",
            dec!(79.99),
            "https://images.unsplash.com/photo-1571781926291-c477ebfd024b",
            "Skincare",
            35,
        ),
        Product::new(
            "Minimalist Bottle Collection",
            "Elegant glass bottles perfect for storage and home organization",
            dec!(39.99),
            "https://images.unsplash.com/photo-1611930022073-b7a4ba5fcccd",
            "Home & Living",
            20,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_shape() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.iter().all(|p| !p.price.is_sign_negative()));
        assert!(catalog.iter().all(|p| p.stock >= 0));
    }

    #[test]
    fn test_seed_replies_are_distinct() {
        let first = seed_reply(Some(sample_catalog().len()));
        let repeat = seed_reply(None);
        assert_eq!(first["message"], "Initialized 8 sample products");
        assert_eq!(repeat["message"], "Products already initialized");
        assert_ne!(first["message"], repeat["message"]);
    }
}
