//! Review metrics for every reviewer of the PRs created in a date window

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::models::{Commit, ContributorMetrics, PullRequest, ReviewComment};
use github::{ClientError, RepositorySource};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::attribution::count_comments_leading_to_change;
use crate::grouping::{comments_for, group_comments_by_review_and_author, group_reviews_by_author};
use crate::metrics::{time_to_first_review, ReviewerTally};
use crate::sessions::total_active_review_duration;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid window: {from} is after {to}")]
    InvalidWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: ClientError,
    },
    #[error("Failed to fetch commits for PR #{pr}: {} error(s)", .errors.len())]
    Commits { pr: u64, errors: Vec<ClientError> },
}

impl MetricsError {
    fn fetch(what: impl Into<String>, source: ClientError) -> Self {
        match source {
            ClientError::RateLimited { retry_after } => MetricsError::RateLimited(retry_after),
            source => MetricsError::Fetch {
                what: what.into(),
                source,
            },
        }
    }

    fn commits(pr: u64, errors: Vec<ClientError>) -> Self {
        let rate_limited = errors.iter().find_map(|e| match e {
            ClientError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        });
        match rate_limited {
            Some(retry_after) => MetricsError::RateLimited(retry_after),
            None => MetricsError::Commits { pr, errors },
        }
    }
}

/// Computes per-reviewer metrics from a repository data source.
/// Each call to `calculate` is an independent run with its own tallies.
pub struct MetricsCalculator<S> {
    source: S,
}

impl<S: RepositorySource> MetricsCalculator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Metrics keyed by reviewer login. Any fetch failure aborts the run and
    /// discards everything accumulated so far.
    pub async fn calculate(
        &self,
        owner: &str,
        repo: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<String, ContributorMetrics>, MetricsError> {
        if from > to {
            return Err(MetricsError::InvalidWindow { from, to });
        }

        info!(
            "Calculating review metrics for {}/{} from {} to {}",
            owner, repo, from, to
        );

        let prs = self
            .source
            .list_pull_requests(owner, repo, from, to)
            .await
            .map_err(|e| MetricsError::fetch("pull requests", e))?;

        let mut tallies: BTreeMap<String, ReviewerTally> = BTreeMap::new();

        for pr in &prs {
            if let Err(e) = self.process_pr(owner, repo, pr, &mut tallies).await {
                warn!("Aborting metrics run at PR #{}: {}", pr.number, e);
                return Err(e);
            }
        }

        info!(
            "Processed {} PRs, {} reviewers, {} API calls",
            prs.len(),
            tallies.len(),
            self.source.api_calls_used()
        );

        Ok(tallies
            .into_iter()
            .map(|(login, tally)| (login, tally.finalize()))
            .collect())
    }

    async fn process_pr(
        &self,
        owner: &str,
        repo: &str,
        pr: &PullRequest,
        tallies: &mut BTreeMap<String, ReviewerTally>,
    ) -> Result<(), MetricsError> {
        info!(
            "PR #{}: {} (API calls used: {}, remaining: {})",
            pr.number,
            pr.title,
            self.source.api_calls_used(),
            self.source
                .api_calls_remaining()
                .map_or_else(|| "unknown".to_string(), |r| r.to_string())
        );

        let reviews = self
            .source
            .list_reviews(owner, repo, pr.number)
            .await
            .map_err(|e| MetricsError::fetch(format!("reviews for PR #{}", pr.number), e))?;
        let reviews_by_author = group_reviews_by_author(&reviews);

        let comments = self
            .source
            .list_comments(owner, repo, pr.number)
            .await
            .map_err(|e| MetricsError::fetch(format!("comments for PR #{}", pr.number), e))?;
        let comments_by_review = group_comments_by_review_and_author(&comments);

        let commits = self.fetch_commits_after_comments(owner, repo, pr, &comments).await?;

        // Attribution looks at every comment on the PR, not just the reviewer's own
        let pr_changes = count_comments_leading_to_change(comments.iter(), &commits) as u32;

        for (login, reviews) in reviews_by_author {
            if login == pr.author_login {
                debug!("Ignoring {} reviewing their own PR #{}", login, pr.number);
                continue;
            }

            let tally = tallies.entry(login.to_string()).or_default();
            tally.prs_reviewed += 1;
            tally.comments_leading_to_changes += pr_changes;

            for review in reviews {
                let Some(submitted_at) = review.submitted_at else {
                    continue;
                };
                let review_comments =
                    comments_for(&comments_by_review, review.id, review.author_id);

                tally.time_to_first_review =
                    tally.time_to_first_review + time_to_first_review(pr.created_at, submitted_at);
                tally.time_to_complete_review = tally.time_to_complete_review
                    + total_active_review_duration(review_comments, submitted_at);
                tally.total_comments += review_comments.len() as u32;
            }

            debug!(
                "PR #{}: {} reviewed, {} PR comments led to changes",
                pr.number, login, pr_changes
            );
        }

        Ok(())
    }

    /// Commits with file detail, or nothing when the PR has no review comments
    async fn fetch_commits_after_comments(
        &self,
        owner: &str,
        repo: &str,
        pr: &PullRequest,
        comments: &[ReviewComment],
    ) -> Result<Vec<Commit>, MetricsError> {
        let Some(first_comment_at) = comments.iter().map(|c| c.created_at).min() else {
            debug!("PR #{} has no review comments, skipping commits", pr.number);
            return Ok(Vec::new());
        };

        let (commits, errors) = self
            .source
            .list_commits(owner, repo, pr.number, first_comment_at, true)
            .await;
        if !errors.is_empty() {
            return Err(MetricsError::commits(pr.number, errors));
        }

        Ok(commits)
    }
}
