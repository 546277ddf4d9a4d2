//! Metrics over a recorded PR timeline
//!
//! PR #412 by alice:
//! - bob: 3 comments 08:20-08:58 submitted at 09:00, approval the next day.
//!   Commit 9f2a4d1 rewrites the hunks at chain.rs lines 10 and 25, commit
//!   c03d88e the hunk at store.rs line 7.
//! - carol: comments at 13:00 and 14:45 submitted at 15:00, plus a pending review.
//!   Only her store.rs line 7 comment is addressed (by c03d88e).
//! - alice replies to bob in a review of her own, which must not count as a
//!   review. Her chain.rs line 10 reply is still addressed by 9f2a4d1.
//!
//! Five of the six PR comments are addressed, and that count is credited to
//! every reviewer of the PR.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::fake_source::FakeSource;
use crate::MetricsCalculator;
use common::models::{Commit, CommitFile, PullRequest, Review, ReviewComment};

#[derive(Debug, Deserialize)]
struct TimelineFixture {
    pull_request: PullRequestFixture,
    reviews: Vec<ReviewFixture>,
    comments: Vec<CommentFixture>,
    commits: Vec<CommitFixture>,
}

#[derive(Debug, Deserialize)]
struct PullRequestFixture {
    number: u64,
    title: String,
    author: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ReviewFixture {
    id: i64,
    user_id: i64,
    login: String,
    #[allow(dead_code)]
    state: String,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CommentFixture {
    review_id: i64,
    user_id: i64,
    path: String,
    original_position: Option<u32>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitFixture {
    sha: String,
    date: DateTime<Utc>,
    files: Vec<FileFixture>,
}

#[derive(Debug, Deserialize)]
struct FileFixture {
    filename: String,
    patch: Option<String>,
}

fn load_source(json: &str) -> FakeSource {
    let fixture: TimelineFixture = serde_json::from_str(json).expect("Invalid JSON");
    let pr = fixture.pull_request;
    let number = pr.number;

    let mut source = FakeSource {
        prs: vec![PullRequest {
            number,
            title: pr.title,
            author_login: pr.author,
            created_at: pr.created_at,
        }],
        ..Default::default()
    };

    source.reviews.insert(
        number,
        fixture
            .reviews
            .into_iter()
            .map(|f| Review {
                id: f.id,
                author_id: f.user_id,
                author_login: f.login,
                submitted_at: f.submitted_at,
            })
            .collect(),
    );
    source.comments.insert(
        number,
        fixture
            .comments
            .into_iter()
            .map(|f| ReviewComment {
                review_id: f.review_id,
                author_id: f.user_id,
                path: f.path,
                original_position: f.original_position,
                created_at: f.created_at,
            })
            .collect(),
    );
    source.commits.insert(
        number,
        fixture
            .commits
            .into_iter()
            .map(|f| Commit {
                sha: f.sha,
                created_at: f.date,
                files: f
                    .files
                    .into_iter()
                    .map(|file| CommitFile {
                        filename: file.filename,
                        patch: file.patch,
                    })
                    .collect(),
            })
            .collect(),
    );

    source
}

async fn run_pr_412() -> std::collections::BTreeMap<String, common::models::ContributorMetrics> {
    let source = load_source(include_str!("fixtures/pr_412_timeline.json"));
    let calculator = MetricsCalculator::new(source);
    let from = "2026-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
    let to = "2026-02-28T23:59:59Z".parse::<DateTime<Utc>>().unwrap();

    calculator.calculate("sigp", "lighthouse", from, to).await.unwrap()
}

#[tokio::test]
async fn test_pr_412_reviewers() {
    let metrics = run_pr_412().await;

    let reviewers: Vec<&str> = metrics.keys().map(String::as_str).collect();
    assert_eq!(reviewers, vec!["bob", "carol"], "alice authored the PR");
}

#[tokio::test]
async fn test_pr_412_bob_two_reviews_one_pr() {
    let metrics = run_pr_412().await;
    let bob = &metrics["bob"];

    assert_eq!(bob.prs_reviewed, 1);
    assert_eq!(bob.total_comments, 3);
    assert_eq!(bob.comments_leading_to_changes, 5);
    // 3h for the first submission plus 29h for the approval
    assert_eq!(bob.average_time_to_first_review, Duration::hours(32));
    // 08:20-09:00 session plus the 3 minute floor for the comment-less approval
    assert_eq!(bob.average_time_to_complete_review, Duration::minutes(43));
    assert!((bob.percentage_comments_leading_to_changes - 500.0 / 3.0).abs() < 0.001);
}

#[tokio::test]
async fn test_pr_412_carol_split_sessions() {
    let metrics = run_pr_412().await;
    let carol = &metrics["carol"];

    assert_eq!(carol.prs_reviewed, 1);
    assert_eq!(carol.total_comments, 2);
    assert_eq!(carol.comments_leading_to_changes, 5);
    assert_eq!(carol.average_time_to_first_review, Duration::hours(9));
    // 13:00 stands alone, 14:45-15:00 is one session
    assert_eq!(carol.average_time_to_complete_review, Duration::minutes(15));
    assert!((carol.percentage_comments_leading_to_changes - 250.0).abs() < 0.001);
}
