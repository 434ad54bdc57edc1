use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use crate::{auth::extractors::AdminUser, state::AppState};

use super::dto::{AdminOverview, AdminStats};
use super::{repo, services};

const RECENT_ATTENDANCE_LIMIT: i64 = 10;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(admin_stats))
        .route("/admin/overview", get(admin_overview))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn admin_stats(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<AdminStats>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let per_day = repo::attendance_counts_between(&state.db, services::window_start(today), today)
        .await
        .map_err(internal)?;
    let per_status = repo::task_counts_by_status(&state.db)
        .await
        .map_err(internal)?;

    Ok(Json(AdminStats {
        attendance_stats: services::daily_series(today, &per_day),
        task_stats: services::status_breakdown(&per_status),
    }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn admin_overview(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<AdminOverview>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let total_users = repo::count_users(&state.db).await.map_err(internal)?;
    let today_attendance: i64 = repo::attendance_counts_between(&state.db, today, today)
        .await
        .map_err(internal)?
        .iter()
        .map(|(_, n)| n)
        .sum();
    let tasks = services::status_breakdown(
        &repo::task_counts_by_status(&state.db).await.map_err(internal)?,
    );
    let recent_attendance = repo::recent_attendance(&state.db, RECENT_ATTENDANCE_LIMIT)
        .await
        .map_err(internal)?;

    info!(total_users, today_attendance, "admin overview served");
    Ok(Json(AdminOverview {
        total_users,
        today_attendance,
        total_tasks: tasks.total(),
        completed_tasks: tasks.completed,
        pending_tasks: tasks.pending,
        recent_attendance,
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "admin query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
