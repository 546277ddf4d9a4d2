#[cfg(test)]
mod tests {
    use crate::sessions::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use common::models::ReviewComment;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, hour, minute, 0).unwrap()
    }

    fn make_comment(created_at: DateTime<Utc>) -> ReviewComment {
        ReviewComment {
            review_id: 1,
            author_id: 11,
            path: "src/lib.rs".to_string(),
            original_position: Some(1),
            created_at,
        }
    }

    fn duration_for(comments: &[ReviewComment], submitted_at: DateTime<Utc>) -> Duration {
        let refs: Vec<&ReviewComment> = comments.iter().collect();
        total_active_review_duration(&refs, submitted_at)
    }

    #[test]
    fn test_no_comments_returns_floor() {
        assert_eq!(
            duration_for(&[], at(10, 0)),
            Duration::minutes(MIN_REVIEW_MINUTES)
        );
    }

    #[test]
    fn test_single_comment_at_submission_returns_floor() {
        let comments = vec![make_comment(at(10, 0))];
        assert_eq!(duration_for(&comments, at(10, 0)), Duration::minutes(3));
    }

    #[test]
    fn test_short_review_clamped_to_floor() {
        let comments = vec![make_comment(at(10, 0))];
        assert_eq!(duration_for(&comments, at(10, 2)), Duration::minutes(3));
    }

    #[test]
    fn test_close_comments_span_whole_range() {
        // 10:00 -> 10:20 -> 10:45 -> submitted 11:10, every gap <= 30 min
        let comments = vec![
            make_comment(at(10, 20)),
            make_comment(at(10, 0)),
            make_comment(at(10, 45)),
        ];

        assert_eq!(duration_for(&comments, at(11, 10)), Duration::minutes(70));
    }

    #[test]
    fn test_exact_gap_threshold_stays_in_period() {
        let comments = vec![make_comment(at(10, 0))];
        assert_eq!(duration_for(&comments, at(10, 30)), Duration::minutes(30));
    }

    #[test]
    fn test_gap_over_threshold_splits_periods() {
        // 10:00-10:10, then 31 min of silence, then 10:41-10:50
        let comments = vec![
            make_comment(at(10, 0)),
            make_comment(at(10, 10)),
            make_comment(at(10, 41)),
        ];

        let total = duration_for(&comments, at(10, 50));

        assert_eq!(total, Duration::minutes(10 + 9));
        assert!(total < Duration::minutes(50), "gap must not be counted");
    }

    #[test]
    fn test_two_comments_31_minutes_apart() {
        let comments = vec![make_comment(at(9, 0)), make_comment(at(9, 31))];

        // Submission 20 min after the second comment extends only the second period
        let total = duration_for(&comments, at(9, 51));

        assert_eq!(total, Duration::minutes(20));
    }

    #[test]
    fn test_isolated_instants_sum_to_floor() {
        // Three isolated instants each contribute zero length
        let comments = vec![make_comment(at(8, 0)), make_comment(at(9, 0))];
        assert_eq!(duration_for(&comments, at(10, 0)), Duration::minutes(3));
    }

    #[test]
    fn test_merge_active_periods_ordering() {
        let periods = merge_active_periods(vec![at(12, 0), at(9, 0), at(9, 15), at(12, 5)]);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].started_at, at(9, 0));
        assert_eq!(periods[0].ended_at, at(9, 15));
        assert_eq!(periods[1].length(), Duration::minutes(5));
        assert!(periods[1].started_at > periods[0].ended_at);
    }

    #[test]
    fn test_merge_active_periods_empty() {
        assert!(merge_active_periods(Vec::new()).is_empty());
    }
}
