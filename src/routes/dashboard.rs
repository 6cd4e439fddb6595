use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::routing::get;
use axum::{Json, Router};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use crate::charts::Charts;
use crate::state::AppState;
use crate::trace::{Trace, X_VALUE_FORMAT};

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct SeriesDto {
    pub name: String,
    pub color: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct DashboardSnapshot {
    pub generated_at: String,
    pub temperatures: Vec<SeriesDto>,
    pub fan_power: Vec<SeriesDto>,
    pub fan_rpm: Vec<SeriesDto>,
}

fn series_dto(trace: &Trace) -> SeriesDto {
    let points = trace.snapshot();
    SeriesDto {
        name: trace.name().to_string(),
        color: trace.color().to_string(),
        x: points.x.clone(),
        y: points.y.clone(),
    }
}

pub(crate) fn snapshot(charts: &Charts) -> DashboardSnapshot {
    DashboardSnapshot {
        generated_at: chrono::Local::now().format(X_VALUE_FORMAT).to_string(),
        temperatures: charts.temperature_traces().map(series_dto).collect(),
        fan_power: charts.fan_power_traces().map(series_dto).collect(),
        fan_rpm: charts.fan_rpm_traces().map(series_dto).collect(),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/state",
    responses((status = 200, description = "Current chart series", body = DashboardSnapshot))
)]
pub(crate) async fn dashboard_state(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(snapshot(&state.charts))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/live",
    responses((status = 200, description = "Server-sent events stream of chart snapshots"))
)]
pub(crate) async fn dashboard_live(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, axum::Error>>> {
    let stream = IntervalStream::new(tokio::time::interval(state.config.push_interval()))
        .map(move |_| Event::default().json_data(&snapshot(&state.charts)));
    Sse::new(stream)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/state", get(dashboard_state))
        .route("/dashboard/live", get(dashboard_live))
}
