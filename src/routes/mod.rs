pub mod dashboard;
pub mod health;
pub mod page;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(page::router())
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(dashboard::router())
                .merge(crate::openapi::router())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn all_surfaces_respond() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(crate::test_support::test_state(&dir));

        for uri in [
            "/",
            "/healthz",
            "/api/dashboard/state",
            "/api/openapi.json",
        ] {
            let resp = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(crate::test_support::test_state(&dir));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
