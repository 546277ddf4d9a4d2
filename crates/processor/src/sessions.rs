//! Active review time from comment timestamps
//!
//! There is no signal for when someone started reading a PR, so each comment
//! and the final review submission are treated as activity instants. Instants
//! close enough together are merged into one continuous period.

use chrono::{DateTime, Duration, Utc};
use common::models::ReviewComment;

/// Maximum gap between two instants of the same period
pub const SESSION_GAP_MINUTES: i64 = 30;

/// Floor on the reported duration, also used when a review has no comments
pub const MIN_REVIEW_MINUTES: i64 = 3;

/// A maximal run of activity with no gap above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePeriod {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl ActivePeriod {
    fn at(instant: DateTime<Utc>) -> Self {
        Self {
            started_at: instant,
            ended_at: instant,
        }
    }

    pub fn length(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// Merge activity instants into periods, in chronological order
pub fn merge_active_periods(mut instants: Vec<DateTime<Utc>>) -> Vec<ActivePeriod> {
    instants.sort();

    let gap = Duration::minutes(SESSION_GAP_MINUTES);
    let mut periods = Vec::new();
    let mut current: Option<ActivePeriod> = None;

    for instant in instants {
        current = match current {
            Some(mut period) if instant - period.ended_at <= gap => {
                period.ended_at = instant;
                Some(period)
            }
            Some(period) => {
                periods.push(period);
                Some(ActivePeriod::at(instant))
            }
            None => Some(ActivePeriod::at(instant)),
        };
    }

    if let Some(period) = current {
        periods.push(period);
    }

    periods
}

/// Total active time a reviewer spent on one review
pub fn total_active_review_duration(
    comments: &[&ReviewComment],
    submitted_at: DateTime<Utc>,
) -> Duration {
    let floor = Duration::minutes(MIN_REVIEW_MINUTES);
    if comments.is_empty() {
        return floor;
    }

    let mut instants = Vec::with_capacity(comments.len() + 1);
    instants.push(submitted_at);
    instants.extend(comments.iter().map(|c| c.created_at));

    let total = merge_active_periods(instants)
        .iter()
        .fold(Duration::zero(), |acc, period| acc + period.length());

    total.max(floor)
}
