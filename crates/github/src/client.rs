//! GitHub REST API client for fetching PRs, reviews, comments and commits

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use common::models::{Commit, CommitFile, PullRequest, Review, ReviewComment};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::source::RepositorySource;
use crate::window::filter_window;

/// Remaining quota below which every response logs a warning
const LOW_QUOTA: u64 = 10;
/// Used when the response carries neither a reset instant nor retry-after
const DEFAULT_RETRY_AFTER: u64 = 60;
const DETAIL_PER_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    per_page: u32,
    quota: Quota,
}

/// PR as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubPr {
    pub number: u64,
    pub title: String,
    pub user: GithubUser,
    pub created_at: DateTime<Utc>,
}

/// Review as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubReview {
    pub id: i64,
    pub user: Option<GithubUser>,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// User as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub id: i64,
    pub login: String,
}

/// Review comment as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubReviewComment {
    pub id: i64,
    pub user: Option<GithubUser>,
    pub path: String,
    pub original_position: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub pull_request_review_id: Option<i64>,
}

/// Commit as returned by GitHub API. `files` is only present on the single-commit endpoint.
#[derive(Debug, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub commit: GithubCommitDetail,
    #[serde(default)]
    pub files: Vec<GithubCommitFile>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitDetail {
    pub author: Option<GithubCommitAuthor>,
    pub committer: Option<GithubCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitAuthor {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitFile {
    pub filename: String,
    pub patch: Option<String>,
}

impl From<GithubPr> for PullRequest {
    fn from(pr: GithubPr) -> Self {
        PullRequest {
            number: pr.number,
            title: pr.title,
            author_login: pr.user.login,
            created_at: pr.created_at,
        }
    }
}

impl From<GithubCommitFile> for CommitFile {
    fn from(file: GithubCommitFile) -> Self {
        CommitFile {
            filename: file.filename,
            patch: file.patch,
        }
    }
}

impl GithubReview {
    /// None for ghost accounts
    fn into_review(self) -> Option<Review> {
        let user = self.user?;
        Some(Review {
            id: self.id,
            author_id: user.id,
            author_login: user.login,
            submitted_at: self.submitted_at,
        })
    }
}

impl GithubReviewComment {
    /// None for ghost accounts and comments detached from a review
    fn into_comment(self) -> Option<ReviewComment> {
        let user = self.user?;
        let review_id = self.pull_request_review_id?;
        Some(ReviewComment {
            review_id,
            author_id: user.id,
            path: self.path,
            original_position: self.original_position,
            created_at: self.created_at,
        })
    }
}

impl GithubCommit {
    fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.commit
            .committer
            .as_ref()
            .or(self.commit.author.as_ref())
            .map(|sig| sig.date)
    }
}

/// Rate limit headers of a single response
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: Option<u64>,
    pub reset: Option<DateTime<Utc>>,
    pub retry_after: Option<u64>,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<i64>().ok())
        };

        Self {
            remaining: number("x-ratelimit-remaining").and_then(|n| u64::try_from(n).ok()),
            reset: number("x-ratelimit-reset").and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            retry_after: number("retry-after").and_then(|n| u64::try_from(n).ok()),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Seconds until the quota resets, never negative
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        match (self.reset, self.retry_after) {
            (Some(reset), _) => u64::try_from((reset - now).num_seconds()).unwrap_or(0),
            (None, Some(retry_after)) => retry_after,
            (None, None) => DEFAULT_RETRY_AFTER,
        }
    }
}

/// API usage counters, updated on every response
#[derive(Debug)]
struct Quota {
    used: AtomicU64,
    /// Negative until the first response reports a value
    remaining: AtomicI64,
}

impl Quota {
    fn new() -> Self {
        Self {
            used: AtomicU64::new(0),
            remaining: AtomicI64::new(-1),
        }
    }

    fn record(&self, limit: &RateLimit) {
        self.used.fetch_add(1, Ordering::Relaxed);
        if let Some(remaining) = limit.remaining {
            self.remaining
                .store(i64::try_from(remaining).unwrap_or(i64::MAX), Ordering::Relaxed);
            if remaining > 0 && remaining < LOW_QUOTA {
                warn!(remaining, "GitHub API rate limit low");
            }
        }
    }

    fn used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    fn remaining(&self) -> Option<u64> {
        u64::try_from(self.remaining.load(Ordering::Relaxed)).ok()
    }
}

/// Whether the `Link` header advertises a next page
pub fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .map(|link| {
            link.split(',')
                .any(|part| part.split(';').skip(1).any(|p| p.trim() == "rel=\"next\""))
        })
        .unwrap_or(false)
}

fn with_page(url: &str, per_page: u32, page: u32) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}per_page={}&page={}", url, sep, per_page, page)
}

impl GitHubClient {
    pub fn new(token: Option<String>, base_url: impl Into<String>, per_page: u32) -> Self {
        Self::with_http_client(reqwest::Client::new(), token, base_url, per_page)
    }

    /// Build on a preconfigured reqwest client
    pub fn with_http_client(
        client: reqwest::Client,
        token: Option<String>,
        base_url: impl Into<String>,
        per_page: u32,
    ) -> Self {
        Self {
            client,
            token,
            base_url: base_url.into(),
            per_page: per_page.clamp(1, 100),
            quota: Quota::new(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("review-metrics/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    /// Issue a GET and check the quota before anything else looks at the response
    async fn send(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let limit = RateLimit::from_headers(resp.headers());
        self.quota.record(&limit);

        let status = resp.status();
        let throttled = status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && limit.retry_after.is_some());
        if limit.exhausted() || throttled {
            let retry_after = limit.retry_after_secs(Utc::now());
            warn!(retry_after, used = self.quota.used(), "GitHub API quota exhausted");
            return Err(ClientError::RateLimited { retry_after });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unauthorized(message));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        let resp = self.send(url).await?;
        Ok(resp.json().await?)
    }

    /// Fetch one page, returning whether another follows
    async fn get_page<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
    ) -> Result<(Vec<T>, bool), ClientError> {
        let resp = self.send(url).await?;
        let has_next = has_next_page(resp.headers());
        Ok((resp.json().await?, has_next))
    }

    /// Fetch every page of a list endpoint
    async fn get_paginated<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        per_page: u32,
    ) -> Result<Vec<T>, ClientError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let (items, has_next) = self.get_page::<T>(&with_page(url, per_page, page)).await?;
            let empty = items.is_empty();
            all.extend(items);

            if !has_next || empty {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Check the credential against `GET /user`, returning the authenticated login
    pub async fn authenticate(&self) -> Result<String, ClientError> {
        let url = format!("{}/user", self.base_url);
        let user: GithubUser = self.get(&url).await?;
        info!("Authenticated as {}", user.login);
        Ok(user.login)
    }

    /// Fetch one page of PRs, newest first
    pub async fn list_prs_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<(Vec<GithubPr>, bool), ClientError> {
        let url = format!(
            "{}/repos/{}/{}/pulls?state=all&sort=created&direction=desc&per_page={}&page={}",
            self.base_url, owner, repo, self.per_page, page
        );
        self.get_page(&url).await
    }

    /// Fetch the changed files of a single commit
    async fn fetch_commit_files(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CommitFile>, ClientError> {
        let url = format!("{}/repos/{}/{}/commits/{}", self.base_url, owner, repo, sha);
        let detailed: GithubCommit = self.get(&url).await?;
        Ok(detailed.files.into_iter().map(CommitFile::from).collect())
    }
}

impl RepositorySource for GitHubClient {
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let mut all_prs = Vec::new();
        let mut page = 1u32;

        loop {
            info!("Fetching PRs page {} for {}/{}", page, owner, repo);
            let (prs, has_next) = self.list_prs_page(owner, repo, page).await?;
            if prs.is_empty() {
                break;
            }

            let prs: Vec<PullRequest> = prs.into_iter().map(PullRequest::from).collect();
            let window = filter_window(&prs, from, to);
            debug!(
                page,
                matched = window.prs.len(),
                reached_older = window.reached_older,
                "Filtered PR page"
            );
            if window.found {
                all_prs.extend_from_slice(window.prs);
            }

            // PRs are sorted by created desc, so once we hit old ones, stop
            if window.reached_older || !has_next {
                break;
            }
            page += 1;
        }

        info!("Fetched {} PRs in window for {}/{}", all_prs.len(), owner, repo);
        Ok(all_prs)
    }

    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<Review>, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            self.base_url, owner, repo, pr_number
        );
        let reviews: Vec<GithubReview> = self.get_paginated(&url, DETAIL_PER_PAGE).await?;

        Ok(reviews
            .into_iter()
            .filter_map(|review| {
                let id = review.id;
                let converted = review.into_review();
                if converted.is_none() {
                    debug!("Skipping review {} without a user on PR #{}", id, pr_number);
                }
                converted
            })
            .collect())
    }

    async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewComment>, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/comments",
            self.base_url, owner, repo, pr_number
        );
        let comments: Vec<GithubReviewComment> = self.get_paginated(&url, DETAIL_PER_PAGE).await?;

        Ok(comments
            .into_iter()
            .filter_map(|comment| {
                let id = comment.id;
                let converted = comment.into_comment();
                if converted.is_none() {
                    debug!("Skipping comment {} on PR #{}", id, pr_number);
                }
                converted
            })
            .collect())
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        since: DateTime<Utc>,
        include_files: bool,
    ) -> (Vec<Commit>, Vec<ClientError>) {
        let mut errors = Vec::new();
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/commits",
            self.base_url, owner, repo, pr_number
        );

        let raw: Vec<GithubCommit> = match self.get_paginated(&url, DETAIL_PER_PAGE).await {
            Ok(commits) => commits,
            Err(e) => {
                errors.push(e);
                return (Vec::new(), errors);
            }
        };

        let mut commits = Vec::with_capacity(raw.len());
        let mut quota_exhausted = false;

        for gh_commit in raw {
            let Some(created_at) = gh_commit.committed_at() else {
                debug!("Skipping commit {} without a date", gh_commit.sha);
                continue;
            };

            let mut commit = Commit {
                sha: gh_commit.sha,
                created_at,
                files: Vec::new(),
            };

            // Per-commit detail costs one call each, only fetch what can match a comment
            if include_files && !quota_exhausted && created_at > since {
                match self.fetch_commit_files(owner, repo, &commit.sha).await {
                    Ok(files) => commit.files = files,
                    Err(e) => {
                        quota_exhausted = matches!(e, ClientError::RateLimited { .. });
                        errors.push(e);
                    }
                }
            }

            commits.push(commit);
        }

        (commits, errors)
    }

    fn api_calls_used(&self) -> u64 {
        self.quota.used()
    }

    fn api_calls_remaining(&self) -> Option<u64> {
        self.quota.remaining()
    }
}
