//! Partitioning of a PR's reviews and review comments

use std::collections::HashMap;

use common::models::{Review, ReviewComment};

/// Submitted reviews keyed by reviewer login
pub type ReviewsByAuthor<'a> = HashMap<&'a str, Vec<&'a Review>>;

/// Comments keyed by review id, then by author id
pub type CommentsByReview<'a> = HashMap<i64, HashMap<i64, Vec<&'a ReviewComment>>>;

/// Group reviews by author login. Reviews never submitted (pending) are dropped.
pub fn group_reviews_by_author(reviews: &[Review]) -> ReviewsByAuthor<'_> {
    let mut grouped: ReviewsByAuthor<'_> = HashMap::new();
    for review in reviews.iter().filter(|r| r.submitted_at.is_some()) {
        grouped
            .entry(review.author_login.as_str())
            .or_default()
            .push(review);
    }
    grouped
}

/// Group comments by `(review_id, author_id)`, keeping the order they were received in
pub fn group_comments_by_review_and_author(comments: &[ReviewComment]) -> CommentsByReview<'_> {
    let mut grouped: CommentsByReview<'_> = HashMap::new();
    for comment in comments {
        grouped
            .entry(comment.review_id)
            .or_default()
            .entry(comment.author_id)
            .or_default()
            .push(comment);
    }
    grouped
}

/// Comments a given author left as part of a given review
pub fn comments_for<'a>(
    grouped: &'a CommentsByReview<'a>,
    review_id: i64,
    author_id: i64,
) -> &'a [&'a ReviewComment] {
    grouped
        .get(&review_id)
        .and_then(|by_author| by_author.get(&author_id))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn make_review(id: i64, login: &str, submitted_at: Option<DateTime<Utc>>) -> Review {
        Review {
            id,
            author_id: id * 10,
            author_login: login.to_string(),
            submitted_at,
        }
    }

    fn make_comment(review_id: i64, author_id: i64, minute: u32) -> ReviewComment {
        ReviewComment {
            review_id,
            author_id,
            path: "src/lib.rs".to_string(),
            original_position: Some(minute),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_pending_reviews_dropped() {
        let submitted = Some(Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap());
        let reviews = vec![
            make_review(1, "alice", submitted),
            make_review(2, "alice", None),
            make_review(3, "bob", None),
            make_review(4, "alice", submitted),
        ];

        let grouped = group_reviews_by_author(&reviews);

        assert_eq!(grouped.len(), 1, "bob only has a pending review");
        let ids: Vec<i64> = grouped["alice"].iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_comments_grouped_by_review_and_author() {
        let comments = vec![
            make_comment(1, 10, 5),
            make_comment(1, 20, 6),
            make_comment(2, 10, 7),
            make_comment(1, 10, 3),
        ];

        let grouped = group_comments_by_review_and_author(&comments);

        let positions: Vec<Option<u32>> = comments_for(&grouped, 1, 10)
            .iter()
            .map(|c| c.original_position)
            .collect();
        assert_eq!(positions, vec![Some(5), Some(3)], "received order is preserved");
        assert_eq!(comments_for(&grouped, 1, 20).len(), 1);
        assert_eq!(comments_for(&grouped, 2, 10).len(), 1);
        assert!(comments_for(&grouped, 3, 10).is_empty());
        assert!(comments_for(&grouped, 2, 20).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(group_reviews_by_author(&[]).is_empty());
        assert!(group_comments_by_review_and_author(&[]).is_empty());
    }
}
