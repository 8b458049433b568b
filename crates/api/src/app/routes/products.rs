use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_products::{CreateProduct, UpdateProduct};

use crate::app::dto::{self, ProductResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateProduct>,
) -> axum::response::Response {
    match services.create_product(body).await {
        Ok(p) => (StatusCode::CREATED, Json(ProductResponse::from(&p))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProduct>,
) -> axum::response::Response {
    match services.update_product(&id, body).await {
        Ok(p) => Json(ProductResponse::from(&p)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.get_product(&id).await {
        Ok(p) => Json(ProductResponse::from(&p)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_products().await {
        Ok(items) => Json(dto::list::<_, ProductResponse>(&items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
