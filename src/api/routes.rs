//! API Routes
//!
//! Configures the Axum router with all catalog endpoints under `/api`.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_attribute, create_category, create_product, delete_attribute, delete_category,
    delete_product, get_category, get_product, health_handler, list_attributes, list_categories,
    list_products, stats_handler, update_attribute, update_category, update_product, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/products", get(list_products))
        .route("/products/create", post(create_product))
        .route(
            "/products/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories))
        .route("/categories/create", post(create_category))
        .route(
            "/categories/:id",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/attributes", get(list_attributes).post(create_attribute))
        .route(
            "/attributes/:id",
            put(update_attribute).delete(delete_attribute),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
