use anyhow::Context;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::attendance::repo_types::{Attendance, NewAttendance};

impl Attendance {
    /// Today's (or any given day's) record for a user.
    pub async fn find_for_user_on_date(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, user_id, check_in_time, check_out_time,
                   latitude, longitude, location_name, status
              FROM attendance
             WHERE user_id = $1 AND check_in_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(db)
        .await
        .context("find attendance for day")?;
        Ok(row)
    }

    /// Inserts a check-in. Returns `None` when the user already has a row for
    /// that day; the unique index settles concurrent check-ins.
    pub async fn create(db: &PgPool, new: &NewAttendance) -> anyhow::Result<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance
                (user_id, check_in_time, check_in_date, latitude, longitude, location_name, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, check_in_date) DO NOTHING
            RETURNING id, user_id, check_in_time, check_out_time,
                      latitude, longitude, location_name, status
            "#,
        )
        .bind(new.user_id)
        .bind(new.checked_in_at)
        .bind(new.check_in_date())
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.location_name)
        .bind(new.status)
        .fetch_optional(db)
        .await
        .context("insert attendance")?;
        Ok(row)
    }

    /// Stamps the check-out time on a still-open record. `false` if it was
    /// already closed or does not exist.
    pub async fn close(
        db: &PgPool,
        attendance_id: Uuid,
        at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let done = sqlx::query(
            r#"
            UPDATE attendance
               SET check_out_time = $2
             WHERE id = $1 AND check_out_time IS NULL
            "#,
        )
        .bind(attendance_id)
        .bind(at)
        .execute(db)
        .await
        .context("update attendance checkout")?;
        Ok(done.rows_affected() == 1)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, user_id, check_in_time, check_out_time,
                   latitude, longitude, location_name, status
              FROM attendance
             WHERE user_id = $1
             ORDER BY check_in_time DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list attendance")?;
        Ok(rows)
    }
}
