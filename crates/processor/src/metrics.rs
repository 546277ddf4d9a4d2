//! Per-reviewer running sums and their final averages

use chrono::{DateTime, Duration, Utc};
use common::models::ContributorMetrics;

/// Time from PR creation to a review submission
pub fn time_to_first_review(pr_created: DateTime<Utc>, review_submitted: DateTime<Utc>) -> Duration {
    review_submitted - pr_created
}

/// Changes attributed to the reviewer's PRs per comment they wrote, in percent.
/// Exceeds 100 when other comments on those PRs were addressed too.
pub fn change_percentage(comments_leading_to_changes: u32, total_comments: u32) -> f64 {
    if total_comments == 0 {
        return 0.0;
    }
    comments_leading_to_changes as f64 / total_comments as f64 * 100.0
}

/// Running sums for one reviewer, accumulated PR by PR
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewerTally {
    pub prs_reviewed: u32,
    pub total_comments: u32,
    pub comments_leading_to_changes: u32,
    pub time_to_first_review: Duration,
    pub time_to_complete_review: Duration,
}

impl Default for ReviewerTally {
    fn default() -> Self {
        Self {
            prs_reviewed: 0,
            total_comments: 0,
            comments_leading_to_changes: 0,
            time_to_first_review: Duration::zero(),
            time_to_complete_review: Duration::zero(),
        }
    }
}

impl ReviewerTally {
    /// Turn the sums into per-PR averages
    pub fn finalize(&self) -> ContributorMetrics {
        let mut metrics = ContributorMetrics {
            prs_reviewed: self.prs_reviewed,
            total_comments: self.total_comments,
            comments_leading_to_changes: self.comments_leading_to_changes,
            percentage_comments_leading_to_changes: change_percentage(
                self.comments_leading_to_changes,
                self.total_comments,
            ),
            ..Default::default()
        };

        if self.prs_reviewed > 0 {
            let prs = i32::try_from(self.prs_reviewed).unwrap_or(i32::MAX);
            metrics.average_comments_per_review =
                self.total_comments as f64 / self.prs_reviewed as f64;
            metrics.average_time_to_first_review = self.time_to_first_review / prs;
            metrics.average_time_to_complete_review = self.time_to_complete_review / prs;
        }

        metrics
    }
}
