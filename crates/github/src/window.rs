//! Date window selection over a page of PRs sorted by creation time, newest first

use chrono::{DateTime, Utc};
use common::models::PullRequest;

/// Result of scanning one page against `[from, to]`
#[derive(Debug, PartialEq, Eq)]
pub struct WindowMatch<'a> {
    /// Contiguous run starting at the first in-window PR
    pub prs: &'a [PullRequest],
    pub found: bool,
    /// A PR created before `from` was seen, so later pages can only be older
    pub reached_older: bool,
}

pub fn filter_window(
    prs: &[PullRequest],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> WindowMatch<'_> {
    let mut start = None;
    let mut end = 0;
    let mut reached_older = false;

    for (i, pr) in prs.iter().enumerate() {
        if pr.created_at < from {
            reached_older = true;
            break;
        }
        end = i;

        // Newer than the window: keep scanning
        if pr.created_at > to {
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
    }

    match start {
        Some(start) => WindowMatch {
            prs: &prs[start..=end],
            found: true,
            reached_older,
        },
        None => WindowMatch {
            prs: &[],
            found: false,
            reached_older,
        },
    }
}
