//! Domain models

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

/// A pull request snapshot, fetched once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author_login: String,
    pub created_at: DateTime<Utc>,
}

/// A PR review. Only reviews with `submitted_at` set are completed review activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub author_id: i64,
    pub author_login: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// An inline review comment, tied to one review and one author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub review_id: i64,
    pub author_id: i64,
    pub path: String,
    /// Line position in the diff the comment was originally made against
    pub original_position: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// A commit on a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub created_at: DateTime<Utc>,
    /// Empty unless file detail was requested for this commit
    pub files: Vec<CommitFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    pub filename: String,
    /// Unified diff text, absent for binary or oversized files
    pub patch: Option<String>,
}

/// Review quality metrics for one reviewer over a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorMetrics {
    pub prs_reviewed: u32,
    pub total_comments: u32,
    pub comments_leading_to_changes: u32,
    pub average_comments_per_review: f64,
    #[serde(serialize_with = "as_seconds")]
    pub average_time_to_first_review: Duration,
    #[serde(serialize_with = "as_seconds")]
    pub average_time_to_complete_review: Duration,
    pub percentage_comments_leading_to_changes: f64,
}

impl Default for ContributorMetrics {
    fn default() -> Self {
        Self {
            prs_reviewed: 0,
            total_comments: 0,
            comments_leading_to_changes: 0,
            average_comments_per_review: 0.0,
            average_time_to_first_review: Duration::zero(),
            average_time_to_complete_review: Duration::zero(),
            percentage_comments_leading_to_changes: 0.0,
        }
    }
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_serialize_durations_as_seconds() {
        let metrics = ContributorMetrics {
            prs_reviewed: 2,
            average_time_to_first_review: Duration::minutes(90),
            average_time_to_complete_review: Duration::minutes(3),
            ..Default::default()
        };

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["average_time_to_first_review"], 5400);
        assert_eq!(json["average_time_to_complete_review"], 180);
        assert_eq!(json["prs_reviewed"], 2);
    }
}
