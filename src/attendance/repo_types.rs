use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Only `Present` is ever written by check-in; the other tags exist in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

/// One user's check-in/check-out pair for a calendar day.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub check_out_time: Option<OffsetDateTime>,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub user_id: Uuid,
    pub checked_in_at: OffsetDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub status: AttendanceStatus,
}

/// Calendar day an instant falls on in UTC. One record per user per such day.
pub fn utc_day(at: OffsetDateTime) -> Date {
    at.to_offset(UtcOffset::UTC).date()
}

impl NewAttendance {
    pub fn check_in_date(&self) -> Date {
        utc_day(self.checked_in_at)
    }
}
