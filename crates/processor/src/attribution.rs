//! Heuristic matching of review comments to the commits that addressed them
//!
//! A comment counts as addressed when a later commit touches the same file with a
//! diff hunk whose removed side starts at the commented line. Changes inside a
//! hunk that starts earlier are not detected.

use common::models::{Commit, ReviewComment};

/// Old-file start line of every hunk header (`@@ -<start>[,<len>] +... @@`) in a patch
pub fn hunk_start_lines(patch: &str) -> impl Iterator<Item = u32> + '_ {
    patch.lines().filter_map(|line| {
        let rest = line.strip_prefix("@@ -")?;
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |end| &rest[..end]);
        digits.parse().ok()
    })
}

/// Whether `commit` changes the commented file at the commented position.
/// The caller guarantees the commit is newer than the comment.
pub fn was_addressed_by_commit(comment: &ReviewComment, commit: &Commit) -> bool {
    let Some(position) = comment.original_position else {
        return false;
    };

    commit
        .files
        .iter()
        .filter(|file| file.filename == comment.path)
        .filter_map(|file| file.patch.as_deref())
        .filter(|patch| !patch.is_empty())
        .any(|patch| hunk_start_lines(patch).any(|start| start == position))
}

/// Number of comments followed by at least one matching commit. Each comment counts once.
pub fn count_comments_leading_to_change<'a, I>(comments: I, commits: &[Commit]) -> usize
where
    I: IntoIterator<Item = &'a ReviewComment>,
{
    comments
        .into_iter()
        .filter(|comment| {
            commits
                .iter()
                .filter(|commit| commit.created_at > comment.created_at)
                .any(|commit| was_addressed_by_commit(comment, commit))
        })
        .count()
}
