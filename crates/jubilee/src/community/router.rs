use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Coordinate, ReportId, ReportSubmission, Vote};
use super::repository::{AlertPublisher, ReportRepository, ReportView};
use super::service::CommunityAlertService;
use crate::error::AppError;

/// Router builder exposing report intake, voting and the live alert level.
pub fn community_router<R, P>(service: Arc<CommunityAlertService<R, P>>) -> Router
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/reports", post(submit_handler::<R, P>))
        .route("/api/v1/reports/:report_id", get(report_handler::<R, P>))
        .route(
            "/api/v1/reports/:report_id/votes",
            post(vote_handler::<R, P>),
        )
        .route(
            "/api/v1/reports/:report_id/resolution",
            post(resolution_handler::<R, P>),
        )
        .route("/api/v1/alerts/current", get(current_alert_handler::<R, P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoteRequest {
    pub vote: Vote,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolutionRequest {
    pub verified: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AlertQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl AlertQuery {
    /// Both coordinates or neither.
    fn reference(&self) -> Result<Option<Coordinate>, &'static str> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinate::new(lat, lon))),
            (None, None) => Ok(None),
            _ => Err("lat and lon must be supplied together"),
        }
    }
}

pub(crate) async fn submit_handler<R, P>(
    State(service): State<Arc<CommunityAlertService<R, P>>>,
    axum::Json(submission): axum::Json<ReportSubmission>,
) -> Response
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    let now = service.now();
    match service.submit(submission, now) {
        Ok(receipt) => {
            let payload = json!({
                "report": ReportView::from(receipt.report),
                "alert": receipt.alert,
                "summary": receipt.alert.summary(),
                "notified": receipt.notified,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn report_handler<R, P>(
    State(service): State<Arc<CommunityAlertService<R, P>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    match service.get(&ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(ReportView::from(report))).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn vote_handler<R, P>(
    State(service): State<Arc<CommunityAlertService<R, P>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<VoteRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    match service.vote(&ReportId(report_id), request.vote) {
        Ok(report) => (StatusCode::OK, axum::Json(ReportView::from(report))).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn resolution_handler<R, P>(
    State(service): State<Arc<CommunityAlertService<R, P>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<ResolutionRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    match service.resolve(&ReportId(report_id), request.verified) {
        Ok(update) => {
            let payload = json!({
                "update": update,
                "badge": update.badge().label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn current_alert_handler<R, P>(
    State(service): State<Arc<CommunityAlertService<R, P>>>,
    Query(query): Query<AlertQuery>,
) -> Response
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    let reference = match query.reference() {
        Ok(reference) => reference,
        Err(message) => return AppError::InvalidInput(message.to_string()).into_response(),
    };

    match service.current_alert(service.now(), reference) {
        Ok(alert) => {
            let payload = json!({
                "alert": alert,
                "summary": alert.summary(),
                "label": alert.level.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}
