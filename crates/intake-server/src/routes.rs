use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use intake_core::ValidationError;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::{require_api_key, ApiKeyGate};
use crate::intake::Intake;
use crate::response::{error_body, success};

pub const RECRUITMENT_PATH: &str = "/api/recruitment";
pub const RECRUITMENT_UNLOCK_PATH: &str = "/api/recruitment/unlock";
pub const REGISTER_PATH: &str = "/api/register";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct AppState {
    pub intake: Intake,
    pub gate: ApiKeyGate,
}

pub fn router(state: AppState) -> Router {
    let gate = state.gate.clone();
    Router::new()
        .route(RECRUITMENT_PATH, get(recruitment_info))
        .route(RECRUITMENT_UNLOCK_PATH, post(submit_recruitment))
        .route(REGISTER_PATH, get(registration_info).post(submit_registration))
        .route_layer(middleware::from_fn_with_state(gate, require_api_key))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn recruitment_info() -> Json<Value> {
    Json(json!({
        "message": "Recruitment API is working",
        "instructions": "Please use POST method to unlock recruitment challenges",
        "endpoints": {
            "unlock": "POST /api/recruitment/unlock - Submit details to unlock challenges"
        }
    }))
}

async fn registration_info() -> Json<Value> {
    Json(json!({
        "message": "Registration API is working",
        "instructions": "Please use POST method to register a new member",
        "endpoints": {
            "register": "POST /api/register - Register a new member"
        }
    }))
}

async fn submit_recruitment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => return reject_body(rejection),
    };
    match state.intake.submit_recruitment(&payload).await {
        Ok(accepted) => success(accepted.ack),
        Err(err) => err.into_response(),
    }
}

async fn submit_registration(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => return reject_body(rejection),
    };
    match state.intake.submit_registration(&payload).await {
        Ok(accepted) => success(accepted.ack),
        Err(err) => err.into_response(),
    }
}

fn reject_body(rejection: JsonRejection) -> Response {
    debug!(error = %rejection.body_text(), "unreadable request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return error_body(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
    }
    error_body(
        StatusCode::BAD_REQUEST,
        ValidationError::NotAnObject.to_string(),
    )
}
