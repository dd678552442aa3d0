//! HTTP route handlers.

use std::time::Duration;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::planner::PlanError;
use crate::ratelimit::{Admission, client_key};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/routes/plan", post(plan_routes))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Cache, rate-limiter and provider counters.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        cache_entries: state.planner.cache().entry_count(),
        rate_limited_clients: state.limiter.tracked_clients(),
        providers: state.planner.provider_statuses(),
    })
}

/// Plan routes between two places.
async fn plan_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let client = client_key(&headers);
    if let Admission::Rejected { retry_after } = state.limiter.check(&client) {
        return Err(AppError::RateLimited { retry_after });
    }

    // Parse JSON manually so we can log the body on failure
    let req: PlanRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let request = req
        .into_plan_request()
        .map_err(|message| AppError::BadRequest { message })?;

    let plan = state.planner.plan_routes(&request).await?;

    Ok(Json(plan.as_ref()).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    RateLimited { retry_after: Duration },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::NoRoutesFound => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::NoRoutesMatchPreferences => AppError::Unprocessable {
                message: "No routes match the given preferences; try relaxing the time or budget limit"
                    .to_string(),
            },
            PlanError::Internal(message) => AppError::Internal { message },
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "no_routes_found"),
            AppError::Unprocessable { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_routes_match_preferences")
            }
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, retry_after) = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unprocessable { message }
            | AppError::Internal { message } => (message, None),
            AppError::RateLimited { retry_after } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (
                    format!("Too many requests; retry in {secs} seconds"),
                    Some(secs),
                )
            }
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            code,
        });
        let mut response = (status, body).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
