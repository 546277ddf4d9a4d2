//! The read-only repository capability the metrics engine depends on

use chrono::{DateTime, Utc};
use common::models::{Commit, PullRequest, Review, ReviewComment};

use crate::client::ClientError;

/// Pull request data source. `GitHubClient` is the production implementation;
/// tests substitute in-memory doubles.
#[allow(async_fn_in_trait)]
pub trait RepositorySource {
    /// PRs created within `[from, to]`, newest first as fetched
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, ClientError>;

    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<Review>, ClientError>;

    async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewComment>, ClientError>;

    /// All commits on the PR. Commits newer than `since` get their changed files
    /// attached when `include_files` is set. Failures are collected instead of
    /// aborting so partial results survive.
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        since: DateTime<Utc>,
        include_files: bool,
    ) -> (Vec<Commit>, Vec<ClientError>);

    /// API calls issued so far
    fn api_calls_used(&self) -> u64;

    /// Quota reported by the most recent response, if any
    fn api_calls_remaining(&self) -> Option<u64>;
}
