use axum::{routing::get, Router};

pub mod locations;
pub mod movements;
pub mod products;
pub mod report;
pub mod system;

/// Router for all resource endpoints (everything except `/health`).
pub fn router() -> Router {
    Router::new()
        .route("/report", get(report::get_report))
        .nest("/products", products::router())
        .nest("/locations", locations::router())
        .nest("/movements", movements::router())
}
