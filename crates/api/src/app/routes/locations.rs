use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_locations::{CreateLocation, UpdateLocation};

use crate::app::dto::{self, LocationResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location).put(update_location))
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateLocation>,
) -> axum::response::Response {
    match services.create_location(body).await {
        Ok(l) => (StatusCode::CREATED, Json(LocationResponse::from(&l))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLocation>,
) -> axum::response::Response {
    match services.update_location(&id, body).await {
        Ok(l) => Json(LocationResponse::from(&l)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.get_location(&id).await {
        Ok(l) => Json(LocationResponse::from(&l)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_locations().await {
        Ok(items) => Json(dto::list::<_, LocationResponse>(&items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
