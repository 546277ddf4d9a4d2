//! Plain text rendering of the final metrics

use std::collections::BTreeMap;

use chrono::Duration;
use common::models::ContributorMetrics;

/// `1h 05m 30s` style, dropping leading zero units
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub fn render_text(metrics: &BTreeMap<String, ContributorMetrics>) -> String {
    if metrics.is_empty() {
        return "No reviews found in the selected window\n".to_string();
    }

    metrics
        .iter()
        .map(|(login, m)| {
            format!(
                "Contributor: {}\n  \
                 PRs Reviewed: {}\n  \
                 Average Comments per Review: {:.2}\n  \
                 Average Time to Complete Review: {}\n  \
                 Average Time to First Review: {}\n  \
                 Total Comments: {}\n  \
                 Percentage of Comments Leading to Changes: {:.2}%\n\n",
                login,
                m.prs_reviewed,
                m.average_comments_per_review,
                format_duration(m.average_time_to_complete_review),
                format_duration(m.average_time_to_first_review),
                m.total_comments,
                m.percentage_comments_leading_to_changes,
            )
        })
        .collect()
}
