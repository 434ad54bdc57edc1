use tracing::{info, instrument};

use crate::attendance::repo_types::{AttendanceStatus, NewAttendance};
use crate::commands::{
    error::CommandError,
    interpreter::{contains_any, CommandContext},
};
use crate::geocoder::{lookup_place, Geocoder};
use crate::store::Store;

const CHECKOUT_PHRASES: &[&str] = &["check out", "checkout"];

/// Checks the caller in, or out when the text asks for it. Both directions
/// need coordinates, and each user gets one record per UTC day.
#[instrument(skip(store, geocoder, command_text, ctx), fields(user_id = %ctx.user_id))]
pub async fn handle_attendance(
    store: &dyn Store,
    geocoder: &dyn Geocoder,
    command_text: &str,
    ctx: &CommandContext,
) -> Result<String, CommandError> {
    let (Some(latitude), Some(longitude)) = (ctx.latitude, ctx.longitude) else {
        return Err(CommandError::MissingLocation);
    };

    let today = ctx.now.date();
    let existing = store
        .find_attendance_for_user_on_date(ctx.user_id, today)
        .await?;

    if contains_any(command_text, CHECKOUT_PHRASES) {
        let open = existing
            .filter(|a| a.check_out_time.is_none())
            .ok_or(CommandError::NoOpenCheckIn)?;
        if !store.update_attendance_checkout(open.id, ctx.now).await? {
            return Err(CommandError::NoOpenCheckIn);
        }
        info!(attendance_id = %open.id, "checked out");
        return Ok("Successfully checked out!".into());
    }

    if existing.is_some() {
        return Err(CommandError::DuplicateCheckIn);
    }

    let place = lookup_place(geocoder, latitude, longitude).await.or_unknown();
    let created = store
        .create_attendance(NewAttendance {
            user_id: ctx.user_id,
            checked_in_at: ctx.now,
            latitude,
            longitude,
            location_name: place.clone(),
            status: AttendanceStatus::Present,
        })
        .await?;

    // Lost a race with a concurrent check-in for the same day.
    let Some(record) = created else {
        return Err(CommandError::DuplicateCheckIn);
    };

    info!(attendance_id = %record.id, place = %place, "checked in");
    Ok(format!("Attendance marked successfully at {}", place))
}

#[cfg(test)]
mod tests {
    use time::{macros::datetime, OffsetDateTime};
    use uuid::Uuid;

    use super::*;
    use crate::geocoder::stubs::{FailingGeocoder, FixedGeocoder};
    use crate::geocoder::MAX_PLACE_LEN;
    use crate::store::memory::MemoryStore;

    fn ctx(user_id: Uuid, at: OffsetDateTime) -> CommandContext {
        CommandContext {
            user_id,
            latitude: Some(51.5074),
            longitude: Some(-0.1278),
            now: at,
        }
    }

    async fn say(
        store: &MemoryStore,
        geocoder: &dyn Geocoder,
        text: &str,
        user_id: Uuid,
        at: OffsetDateTime,
    ) -> Result<String, CommandError> {
        handle_attendance(store, geocoder, text, &ctx(user_id, at)).await
    }

    #[tokio::test]
    async fn missing_coordinates_are_rejected() {
        let store = MemoryStore::new();
        let geo = FixedGeocoder("London");
        let mut c = ctx(Uuid::new_v4(), datetime!(2026-10-18 09:00 UTC));
        c.longitude = None;
        let err = handle_attendance(&store, &geo, "check in", &c).await.unwrap_err();
        assert!(matches!(err, CommandError::MissingLocation));

        c.latitude = None;
        c.longitude = Some(1.0);
        let err = handle_attendance(&store, &geo, "check out", &c).await.unwrap_err();
        assert!(matches!(err, CommandError::MissingLocation));
        assert!(store.attendance().is_empty());
    }

    #[tokio::test]
    async fn zero_coordinates_are_a_valid_location() {
        let store = MemoryStore::new();
        let mut c = ctx(Uuid::new_v4(), datetime!(2026-10-18 09:00 UTC));
        c.latitude = Some(0.0);
        c.longitude = Some(0.0);
        let msg = handle_attendance(&store, &FixedGeocoder("Null Island"), "check in", &c)
            .await
            .unwrap();
        assert_eq!(msg, "Attendance marked successfully at Null Island");
    }

    #[tokio::test]
    async fn check_in_records_present_with_place() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let geo = FixedGeocoder("Westminster, London");
        say(&store, &geo, "check in", user, datetime!(2026-10-18 09:00 UTC))
            .await
            .unwrap();

        let rows = store.attendance();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AttendanceStatus::Present);
        assert_eq!(rows[0].location_name.as_deref(), Some("Westminster, London"));
        assert_eq!(rows[0].latitude, 51.5074);
        assert_eq!(rows[0].check_in_time, datetime!(2026-10-18 09:00 UTC));
    }

    #[tokio::test]
    async fn failing_geocoder_records_unknown_location() {
        let store = MemoryStore::new();
        let msg = say(
            &store,
            &FailingGeocoder,
            "check in",
            Uuid::new_v4(),
            datetime!(2026-10-18 09:00 UTC),
        )
        .await
        .unwrap();
        assert_eq!(msg, "Attendance marked successfully at Unknown Location");
        assert_eq!(store.attendance()[0].location_name.as_deref(), Some("Unknown Location"));
    }

    #[tokio::test]
    async fn very_long_place_name_still_checks_in() {
        let store = MemoryStore::new();
        let geo = FixedGeocoder(
            "Some Building, Some Building, Some Building, Some Building, Some Building, \
             Some Building, Some Building, Some Building, Some Building, Some Building, \
             Some Building, Some Building, Some Building, Some Building, Some Building, \
             Some Building",
        );
        let msg = say(&store, &geo, "check in", Uuid::new_v4(), datetime!(2026-10-18 09:00 UTC))
            .await
            .unwrap();

        let place = store.attendance()[0].location_name.clone().unwrap();
        assert_eq!(place.chars().count(), MAX_PLACE_LEN);
        assert_eq!(msg, format!("Attendance marked successfully at {place}"));
    }

    #[tokio::test]
    async fn check_out_closes_the_open_record_once() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let geo = FixedGeocoder("Office");
        say(&store, &geo, "check in", user, datetime!(2026-10-18 09:00 UTC))
            .await
            .unwrap();

        let msg = say(&store, &geo, "checkout", user, datetime!(2026-10-18 17:30 UTC))
            .await
            .unwrap();
        assert_eq!(msg, "Successfully checked out!");
        let closed_at = Some(datetime!(2026-10-18 17:30 UTC));
        assert_eq!(store.attendance()[0].check_out_time, closed_at);

        let err = say(&store, &geo, "check out", user, datetime!(2026-10-18 18:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NoOpenCheckIn));
        assert_eq!(store.attendance()[0].check_out_time, closed_at);
    }

    #[tokio::test]
    async fn check_in_after_check_out_is_still_a_duplicate() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let geo = FixedGeocoder("Office");
        say(&store, &geo, "check in", user, datetime!(2026-10-18 09:00 UTC))
            .await
            .unwrap();
        say(&store, &geo, "check out", user, datetime!(2026-10-18 12:00 UTC))
            .await
            .unwrap();

        let err = say(&store, &geo, "check in", user, datetime!(2026-10-18 13:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCheckIn));
        assert_eq!(store.attendance().len(), 1);
    }

    #[tokio::test]
    async fn yesterdays_open_record_is_not_closed_today() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let geo = FixedGeocoder("Office");
        say(&store, &geo, "check in", user, datetime!(2026-10-17 09:00 UTC))
            .await
            .unwrap();

        let err = say(&store, &geo, "check out", user, datetime!(2026-10-18 08:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NoOpenCheckIn));
        assert!(store.attendance()[0].check_out_time.is_none());

        say(&store, &geo, "check in", user, datetime!(2026-10-18 09:00 UTC))
            .await
            .unwrap();
        assert_eq!(store.attendance().len(), 2);
    }
}
