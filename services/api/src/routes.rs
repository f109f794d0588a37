use crate::infra::{deserialize_optional_datetime, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDateTime};
use jubilee::community::{community_router, AlertPublisher, CommunityAlertService, ReportRepository};
use jubilee::conditions::{ConditionScore, EnvironmentalReading, ScoreEngine};
use jubilee::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) reading: EnvironmentalReading,
    /// Evaluation time; defaults to the local clock.
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) now: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) score: ConditionScore,
    pub(crate) level: &'static str,
    pub(crate) description: &'static str,
    pub(crate) summary: String,
}

pub(crate) fn with_api_routes<R, P>(service: Arc<CommunityAlertService<R, P>>) -> axum::Router
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    community_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/conditions/score",
            axum::routing::post(condition_score_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Feeds are trusted by the engine, so sanity checks live at this boundary.
pub(crate) fn validate_reading(reading: &EnvironmentalReading) -> Result<(), AppError> {
    if !reading.wind_speed.is_finite() || reading.wind_speed < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "wind_speed must be a non-negative number of m/s, got {}",
            reading.wind_speed
        )));
    }
    if reading.wind_direction.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "wind_direction must not be empty".to_string(),
        ));
    }
    if let Some(salinity) = reading.salinity {
        if salinity < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "salinity gradient must be non-negative, got {salinity}"
            )));
        }
    }
    Ok(())
}

pub(crate) async fn condition_score_endpoint(
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest { reading, now } = payload;
    validate_reading(&reading)?;

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let score = ScoreEngine::new().score(&reading, now);
    debug!(total = score.total, gate = ?score.gate, "condition score computed");

    let level = score.level();
    Ok(Json(ScoreResponse {
        level: level.label(),
        description: level.description(),
        summary: score.summary(),
        score,
    }))
}
