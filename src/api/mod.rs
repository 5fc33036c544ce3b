//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /api/products`, `GET /api/products/:id` - Cached product reads
//! - `POST /api/products/create`, `PATCH|DELETE /api/products/:id` - Product writes
//! - `GET /api/categories`, `GET /api/categories/:id` - Cached category reads
//! - `POST /api/categories/create`, `PATCH|DELETE /api/categories/:id` - Category writes
//! - `GET|POST /api/attributes`, `PUT|DELETE /api/attributes/:id` - Attributes
//! - `GET /api/cache/stats` - Cache counters
//! - `GET /api/health` - Health check

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::ValidJson;
pub use handlers::AppState;
pub use routes::create_router;
