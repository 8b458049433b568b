use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::dto::ReportResponse;
use crate::app::errors;
use crate::app::services::AppServices;

/// Balance per product per location, computed fresh on every request.
pub async fn get_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.report().await {
        Ok(report) => Json(ReportResponse::from(report)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
