//! MicroMart E-Commerce API
//!
//! Small e-commerce backend: user registration/login, product catalog,
//! a per-user shopping cart, order placement, and mock payment
//! processing, backed by Postgres.
//!
//! ## Services
//! - Users: register, login, profile (JWT bearer auth)
//! - Products: catalog browsing, creation, sample seed
//! - Cart: one mutable cart per user, line-item merge, derived total
//! - Orders: immutable snapshot of a cart at checkout
//! - Payments: mock always-succeeds gateway

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod routes;
pub mod store;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(routes::users::register))
        .route("/users/login", post(routes::users::login))
        .route("/users/profile", get(routes::users::profile))
        .route(
            "/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route("/products/:id", get(routes::products::get_product))
        .route("/cart", get(routes::cart::get_cart))
        .route("/cart/add", post(routes::cart::add_to_cart))
        .route("/cart/remove/:product_id", delete(routes::cart::remove_from_cart))
        .route(
            "/orders",
            get(routes::orders::list_orders).post(routes::orders::create_order),
        )
        .route("/orders/:id", get(routes::orders::get_order))
        .route("/payments/:order_id", post(routes::payments::process_payment))
        .route("/admin/init-products", post(routes::products::seed_products))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "micromart" }))
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allow_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
