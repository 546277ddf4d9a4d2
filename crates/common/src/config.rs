//! Application configuration

use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// How the final metrics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!("unknown format: {}", other))),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub owner: String,
    pub repo: String,
    /// Window size in days, counted back from today's midnight
    pub days: u32,
    pub api_url: String,
    /// Page size for the pull request listing
    pub per_page: u32,
    pub output: OutputFormat,
    pub log_format: OutputFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} is required", key)))
        };

        Ok(Self {
            github_token: required("GITHUB_TOKEN")?,
            owner: required("GITHUB_OWNER")?,
            repo: required("GITHUB_REPO")?,
            days: parse_or(&lookup, "REVIEW_DAYS", 7)?,
            api_url: lookup("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            per_page: parse_or(&lookup, "GITHUB_PER_PAGE", 50)?,
            output: parse_or(&lookup, "OUTPUT_FORMAT", OutputFormat::Text)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", OutputFormat::Text)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}
