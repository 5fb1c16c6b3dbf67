//! API routes for triadd.
//!
//! Four POST endpoints drive the pipeline (the caller sequences the stages
//! by feeding each reply into the next request) and GET / serves the
//! front-end entry document. Every failure is a JSON envelope: 400 with a
//! summary when a required field is missing, 500 with the upstream message
//! when a backend call fails.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};

use triad_common::types::{
    DirectRequest, ErrorBody, Stage1Request, Stage2Request, Stage3Request, StageReply,
};

use crate::dispatch::{self, DispatchError};
use crate::server::AppState;

type AppStateArc = Arc<AppState>;

/// An endpoint failure, rendered as the JSON error envelope.
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn validation(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.to_string(),
                details: None,
            },
        }
    }

    fn stage_failure(summary: &str, details: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: summary.to_string(),
                details: Some(details),
            },
        }
    }

    /// Map a dispatch failure, tagging backend errors with the endpoint's
    /// summary line.
    fn from_dispatch(summary: &'static str, err: DispatchError) -> Self {
        match err {
            DispatchError::Invalid(message) => Self::validation(message),
            DispatchError::Provider(e) => {
                error!("{}: {}", summary, e);
                Self::stage_failure(summary, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============================================================================
// Pipeline Routes
// ============================================================================

pub fn review_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/review/stage1", post(stage1))
        .route("/review/stage2", post(stage2))
        .route("/review/stage3", post(stage3))
        .route("/review/direct", post(direct))
}

async fn stage1(
    State(state): State<AppStateArc>,
    Json(req): Json<Stage1Request>,
) -> Result<Json<StageReply>, ApiError> {
    info!("stage1: {} chars, provider_a={}", req.prompt.len(), req.use_provider_a);
    dispatch::run_stage1(&state, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_dispatch("Error in stage 1", e))
}

async fn stage2(
    State(state): State<AppStateArc>,
    Json(req): Json<Stage2Request>,
) -> Result<Json<StageReply>, ApiError> {
    info!("stage2: {} chars", req.stage1_response.len());
    dispatch::run_stage2(&state, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_dispatch("Error in stage 2", e))
}

async fn stage3(
    State(state): State<AppStateArc>,
    Json(req): Json<Stage3Request>,
) -> Result<Json<StageReply>, ApiError> {
    info!("stage3: {} chars, provider_a={}", req.stage2_response.len(), req.use_provider_a);
    dispatch::run_stage3(&state, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_dispatch("Error in stage 3", e))
}

async fn direct(
    State(state): State<AppStateArc>,
    Json(req): Json<DirectRequest>,
) -> Result<Json<StageReply>, ApiError> {
    info!("direct: {} chars, model={}", req.prompt.len(), req.model);
    dispatch::run_direct(&state, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_dispatch("Error in direct call", e))
}

// ============================================================================
// Front-end Routes
// ============================================================================

pub fn ui_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../public/index.html"))
}
