use time::{Date, Duration};

use crate::admin::dto::{DailyCount, TaskStats};
use crate::tasks::repo_types::TaskStatus;

pub const STATS_WINDOW_DAYS: i64 = 7;

/// First day of the window that ends with `today`.
pub fn window_start(today: Date) -> Date {
    today - Duration::days(STATS_WINDOW_DAYS - 1)
}

/// One entry per day of the window, oldest first, zero when nobody checked in.
pub fn daily_series(today: Date, counts: &[(Date, i64)]) -> Vec<DailyCount> {
    let start = window_start(today);
    (0..STATS_WINDOW_DAYS)
        .map(|offset| {
            let day = start + Duration::days(offset);
            let count = counts
                .iter()
                .find(|(d, _)| *d == day)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            DailyCount {
                date: day.to_string(),
                count,
            }
        })
        .collect()
}

pub fn status_breakdown(counts: &[(TaskStatus, i64)]) -> TaskStats {
    counts
        .iter()
        .fold(TaskStats::default(), |mut stats, (status, n)| {
            match status {
                TaskStatus::Pending => stats.pending += n,
                TaskStatus::InProgress => stats.in_progress += n,
                TaskStatus::Completed => stats.completed += n,
            }
            stats
        })
}
