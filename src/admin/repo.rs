use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use crate::admin::dto::RecentAttendance;
use crate::tasks::repo_types::TaskStatus;

pub async fn count_users(db: &PgPool) -> anyhow::Result<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
        .context("count users")?;
    Ok(n)
}

/// Check-ins per day in `[from, to]`; days without any are absent.
pub async fn attendance_counts_between(
    db: &PgPool,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<(Date, i64)>> {
    let rows = sqlx::query_as::<_, (Date, i64)>(
        r#"
        SELECT check_in_date, COUNT(*)
          FROM attendance
         WHERE check_in_date BETWEEN $1 AND $2
         GROUP BY check_in_date
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("count attendance per day")?;
    Ok(rows)
}

pub async fn task_counts_by_status(db: &PgPool) -> anyhow::Result<Vec<(TaskStatus, i64)>> {
    let rows = sqlx::query_as::<_, (TaskStatus, i64)>(
        r#"
        SELECT status, COUNT(*)
          FROM tasks
         GROUP BY status
        "#,
    )
    .fetch_all(db)
    .await
    .context("count tasks per status")?;
    Ok(rows)
}

pub async fn recent_attendance(db: &PgPool, limit: i64) -> anyhow::Result<Vec<RecentAttendance>> {
    let rows = sqlx::query_as::<_, RecentAttendance>(
        r#"
        SELECT a.id, a.user_id, u.username, a.check_in_time, a.check_out_time,
               a.location_name, a.status
          FROM attendance a
          JOIN users u ON u.id = a.user_id
         ORDER BY a.check_in_time DESC
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("recent attendance")?;
    Ok(rows)
}
