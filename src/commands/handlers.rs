use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument};

use crate::{auth::extractors::AuthUser, state::AppState};

use super::dto::{CommandRequest, CommandResponse};
use super::interpreter::{interpret, CommandContext};

pub fn command_routes() -> Router<AppState> {
    Router::new().route("/voice-command", post(process_command))
}

/// Always answers `{success, message}`; only a failed log write is a 500.
#[instrument(skip(state, payload))]
pub async fn process_command(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, (StatusCode, String)> {
    let ctx = CommandContext::new(user_id, payload.latitude, payload.longitude);
    let outcome = interpret(
        state.store.as_ref(),
        state.geocoder.as_ref(),
        &payload.command,
        &ctx,
    )
    .await
    .map_err(|e| {
        error!(error = %format!("{e:#}"), %user_id, "command could not be recorded");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(
        %user_id,
        intent = %outcome.intent,
        success = outcome.response.success,
        "voice command answered"
    );
    Ok(Json(outcome.response))
}
