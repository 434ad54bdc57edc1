use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::{auth::extractors::AuthUser, pagination::Pagination, state::AppState};

use super::repo_types::{utc_day, Attendance};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list_attendance))
        .route("/attendance/today", get(today_attendance))
}

/// `null` until the caller checks in.
#[instrument(skip(state))]
pub async fn today_attendance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Option<Attendance>>, (StatusCode, String)> {
    let today = utc_day(OffsetDateTime::now_utc());
    let record = state
        .store
        .find_attendance_for_user_on_date(user_id, today)
        .await
        .map_err(internal)?;
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn list_attendance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Attendance>>, (StatusCode, String)> {
    let (limit, offset) = p.clamped();
    let rows = state
        .store
        .list_attendance(user_id, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "attendance storage failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
