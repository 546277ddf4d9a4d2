//! GitHub API data source for PRs, reviews, comments and commits

pub mod client;
pub mod source;
pub mod window;

pub use client::{ClientError, GitHubClient, RateLimit};
pub use source::RepositorySource;
pub use window::{filter_window, WindowMatch};
