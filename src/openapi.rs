use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value as JsonValue;
use utoipa::OpenApi;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fan-dashboard",
        description = "Chassis telemetry dashboard API"
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::dashboard::dashboard_state,
        crate::routes::dashboard::dashboard_live,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::dashboard::DashboardSnapshot,
        crate::routes::dashboard::SeriesDto,
    ))
)]
struct ApiDoc;

pub(crate) async fn openapi_handler() -> AppResult<Json<JsonValue>> {
    let doc = serde_json::to_value(ApiDoc::openapi())
        .map_err(|err| AppError::internal(format!("failed to render OpenAPI document: {err}")))?;
    Ok(Json(doc))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_dashboard_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc.get("paths").and_then(|p| p.as_object()).unwrap();
        assert!(paths.contains_key("/healthz"));
        assert!(paths.contains_key("/api/dashboard/state"));
        assert!(paths.contains_key("/api/dashboard/live"));
    }
}
