use std::{net::SocketAddr, sync::Arc, time::SystemTime};

use axum::{
    Json,
    extract::{ConnectInfo, Query, State as AxumState, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use tracing::warn;
use worldfeel_core::types::{AggregateResult, DeviceToken};
use worldfeel_core::{StatsQuery, SubmitOutcome, SubmitRequest, Submission};

use crate::{
    error::AppError,
    state::State,
    utils::{device_cookie, network_address, non_blank, set_device_cookie},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub word: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    #[serde(default)]
    pub your_word: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    success: bool,
    data: AggregateResult,
    message: String,
    can_edit: bool,
    edit_window_minutes: u64,
    edit_window_remaining_seconds: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictResponse {
    success: bool,
    error: &'static str,
    message: String,
    data: AggregateResult,
    can_edit: bool,
}

#[derive(Serialize)]
struct StatsResponse {
    success: bool,
    data: AggregateResult,
}

/// Cookie tokens are only trusted if they are well-formed; a bad cookie is
/// treated as no cookie so the caller gets a fresh one.
fn cookie_token(headers: &HeaderMap) -> Option<String> {
    device_cookie(headers).filter(|token| DeviceToken::try_new(token.as_str()).is_ok())
}

pub async fn submit_handler(
    AxumState(state): AxumState<Arc<State>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|e| {
        warn!("Rejected submit payload: {e}");
        AppError::MalformedPayload
    })?;

    let request = SubmitRequest {
        word: body.word,
        network_address: network_address(&headers, peer),
        device_token: non_blank(body.device_id).or_else(|| cookie_token(&headers)),
    };

    let coordinator_state = state.clone();
    let submission =
        spawn_blocking(move || coordinator_state.coordinator.submit(request, SystemTime::now()))
            .await??;

    let edit_window_minutes = state.coordinator.windows().edit_window.as_secs() / 60;
    Ok(submit_response(submission, edit_window_minutes))
}

fn submit_response(submission: Submission, edit_window_minutes: u64) -> Response {
    let Submission {
        outcome,
        aggregate,
        device_token,
        device_token_issued,
        edit_window_remaining,
    } = submission;

    let remaining_seconds = edit_window_remaining.map_or(0, |d| d.as_secs());
    let mut response = match outcome {
        SubmitOutcome::Created { record } => (
            StatusCode::CREATED,
            Json(SubmitResponse {
                success: true,
                data: aggregate,
                message: format!("Thanks for sharing that you feel {}", record.word),
                can_edit: true,
                edit_window_minutes,
                edit_window_remaining_seconds: remaining_seconds,
            }),
        )
            .into_response(),
        SubmitOutcome::Updated {
            record,
            previous_word,
        } => (
            StatusCode::OK,
            Json(SubmitResponse {
                success: true,
                data: aggregate,
                message: format!("Updated your word from {previous_word} to {}", record.word),
                can_edit: true,
                edit_window_minutes,
                edit_window_remaining_seconds: remaining_seconds,
            }),
        )
            .into_response(),
        SubmitOutcome::Conflict { existing } => (
            StatusCode::CONFLICT,
            Json(ConflictResponse {
                success: false,
                error: "Already submitted",
                message: format!(
                    "You already shared that you feel {} and it can no longer be changed",
                    existing.word
                ),
                data: aggregate,
                can_edit: false,
            }),
        )
            .into_response(),
    };

    if device_token_issued {
        match HeaderValue::from_str(&set_device_cookie(device_token.as_str())) {
            Ok(cookie) => {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            Err(e) => warn!("Could not encode device cookie: {e}"),
        }
    }

    response
}

pub async fn stats_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
    Query(params): Query<StatsParams>,
) -> Result<Response, AppError> {
    let query = StatsQuery {
        your_word: non_blank(params.your_word),
        device_token: non_blank(params.device_id).or_else(|| cookie_token(&headers)),
    };

    let data = spawn_blocking(move || state.coordinator.stats(query, SystemTime::now())).await??;

    let mut response = Json(StatsResponse {
        success: true,
        data,
    })
    .into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
