//! HTTP handlers for the banking API.
//!
//! Lookup handlers answer synchronously from the shared [`Bank`]. Streaming
//! handlers validate their pacing parameters up front, so an out-of-range
//! delay is reported as a clean `422` before any chunk is written, then hand
//! off to [`stream_words`].
//!
//! [`Bank`]: contoso_core::Bank

use super::state::AppState;
use crate::server::{
    config::{DEFAULT_MESSAGE, DEFAULT_PROMPT, GENERATED_RESPONSE},
    streaming::coordinator::stream_words,
    telemetry::{increment_lookup_misses, increment_requests},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contoso_core::{
    DirectoryLookup, Error, LedgerLookup, ProfileQuery, Result,
    stream::Pacer,
    types::{BalanceRecord, BalanceRequest, UserProfile},
};
use core::time::Duration;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    pub message: Option<String>,
    pub delay_ms: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    pub prompt: Option<String>,
}

/// GET / - Service metadata
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "title": "Contoso Banking API",
        "description": "API demo para Copilot Studio (User Profile y Balance Information)",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - Serving status
pub async fn health(State(state): State<AppState>) -> Response {
    if state.is_serving() {
        Json(json!({ "status": "SERVING" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "NOT_SERVING" })),
        )
            .into_response()
    }
}

/// GET /users - Every registered profile
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserProfile>> {
    increment_requests("/users");
    Json(state.bank().directory().profiles().to_vec())
}

/// GET /user/profile - Profile by `userId`, `email` or `name`
#[tracing::instrument(skip_all)]
pub async fn user_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<UserProfile>> {
    increment_requests("/user/profile");
    match state.bank().directory().find(&query) {
        Ok(profile) => Ok(Json(profile.clone())),
        Err(e) => {
            increment_lookup_misses("/user/profile");
            Err(e)
        }
    }
}

/// POST /account/balance - Balance of one account
#[tracing::instrument(skip_all)]
pub async fn account_balance(
    State(state): State<AppState>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceRecord>> {
    increment_requests("/account/balance");
    match state.bank().ledger().balance(&request.account_id) {
        Ok(record) => Ok(Json(record.clone())),
        Err(e) => {
            increment_lookup_misses("/account/balance");
            Err(e)
        }
    }
}

/// GET /stream - Streams `message` word by word, `delay_ms` apart
#[tracing::instrument(skip_all)]
pub async fn stream(
    State(state): State<AppState>,
    params: core::result::Result<Query<StreamParams>, QueryRejection>,
) -> Result<Response> {
    increment_requests("/stream");
    let config = state.config();

    // An unparseable `delay_ms` is as out of range as a negative one.
    let Query(params) = params.map_err(|rejection| {
        Error::invalid_argument(format!(
            "delay_ms must be an integer between 0 and {}: {}",
            config.max_delay.as_millis(),
            rejection.body_text()
        ))
    })?;

    let delay = match params.delay_ms {
        None => config.default_delay,
        Some(ms) => {
            let ms = u64::try_from(ms).map_err(|_| {
                Error::invalid_argument(format!(
                    "delay_ms must be between 0 and {}, got {ms}",
                    config.max_delay.as_millis()
                ))
            })?;
            Duration::from_millis(ms)
        }
    };
    let pacer = Pacer::bounded(delay, config.max_delay)?;

    let message = params.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
    Ok(stream_words(&state, message, pacer))
}

/// GET /generate_stream - Streams a canned answer at the generation pace
///
/// The prompt is accepted and logged but does not influence the answer.
#[tracing::instrument(skip_all)]
pub async fn generate_stream(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
) -> Result<Response> {
    increment_requests("/generate_stream");
    let prompt = params.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    tracing::debug!(prompt, "simulated generation");

    let config = state.config();
    let pacer = Pacer::bounded(config.generate_delay, config.max_delay)?;
    Ok(stream_words(&state, GENERATED_RESPONSE, pacer))
}
