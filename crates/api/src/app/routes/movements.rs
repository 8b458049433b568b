use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_inventory::RecordMovement;

use crate::app::dto::{self, MovementResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// Movements are append-only: no update or delete routes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements).post(record_movement))
        .route("/:id", get(get_movement))
}

pub async fn record_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RecordMovement>,
) -> axum::response::Response {
    match services.record_movement(body).await {
        Ok(m) => (StatusCode::CREATED, Json(MovementResponse::from(&m))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.get_movement(&id).await {
        Ok(m) => Json(MovementResponse::from(&m)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Newest first.
pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_movements().await {
        Ok(items) => Json(dto::list::<_, MovementResponse>(&items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
