//! Voting Period Lifecycle Tests
//!
//! These tests validate the pure parts of the reset protocol: period end
//! date arithmetic across policies and the stats aggregation that closes
//! a period.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use towaba_server::models::ResetFrequency;
use towaba_server::period::{
    aggregate_period_stats, next_period_end, PeriodVote, ResetActor,
};

fn vote(nominee_id: Uuid, name: &str, voter: &str, count: i32, amount: i64) -> PeriodVote {
    PeriodVote {
        nominee_id,
        nominee_name: name.to_string(),
        voter_identifier: voter.to_string(),
        vote_count: count,
        amount,
    }
}

// ============================================================================
// Period End Date Arithmetic
// ============================================================================

#[test]
fn test_weekly_reset_adds_seven_days() {
    let from = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    let end = next_period_end(ResetFrequency::Weekly, None, from)
        .unwrap()
        .unwrap();
    assert_eq!(end - from, Duration::days(7));
}

#[test]
fn test_monthly_reset_uses_calendar_months() {
    let from = Utc.with_ymd_and_hms(2025, 4, 15, 8, 30, 0).unwrap();
    let end = next_period_end(ResetFrequency::Monthly, None, from)
        .unwrap()
        .unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 15, 8, 30, 0).unwrap());
}

#[test]
fn test_monthly_reset_clamps_to_month_end() {
    // Jan 31 + 1 month lands on Feb 28 (non-leap year)
    let from = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
    let end = next_period_end(ResetFrequency::Monthly, None, from)
        .unwrap()
        .unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());

    // Leap year keeps Feb 29
    let from = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    let end = next_period_end(ResetFrequency::Monthly, None, from)
        .unwrap()
        .unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
}

#[test]
fn test_custom_reset_uses_configured_days() {
    let from = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let end = next_period_end(ResetFrequency::Custom, Some(14), from)
        .unwrap()
        .unwrap();
    assert_eq!(end - from, Duration::days(14));
}

#[test]
fn test_custom_reset_rejects_missing_or_invalid_days() {
    let from = Utc::now();
    assert!(next_period_end(ResetFrequency::Custom, None, from).is_err());
    assert!(next_period_end(ResetFrequency::Custom, Some(0), from).is_err());
    assert!(next_period_end(ResetFrequency::Custom, Some(-3), from).is_err());
    assert!(next_period_end(ResetFrequency::Custom, Some(366), from).is_err());
}

#[test]
fn test_manual_reset_is_open_ended() {
    let end = next_period_end(ResetFrequency::Manual, None, Utc::now()).unwrap();
    assert!(end.is_none());
}

#[test]
fn test_manual_reset_ignores_custom_days() {
    // A leftover custom_reset_days value must not give a manual campaign an end date
    let end = next_period_end(ResetFrequency::Manual, Some(30), Utc::now()).unwrap();
    assert!(end.is_none());
}

// ============================================================================
// Stats Aggregation
// ============================================================================

#[test]
fn test_empty_period_closes_with_zero_stats() {
    let stats = aggregate_period_stats(&[]);
    assert_eq!(stats.total_votes, 0);
    assert_eq!(stats.total_revenue, 0);
    assert_eq!(stats.total_voters, 0);
    assert!(stats.per_nominee.is_empty());
}

#[test]
fn test_aggregation_is_pure_and_idempotent() {
    let nominee = Uuid::new_v4();
    let votes = vec![
        vote(nominee, "Ama", "+233200000001", 3, 300),
        vote(nominee, "Ama", "+233200000002", 2, 200),
    ];

    let first = aggregate_period_stats(&votes);
    let second = aggregate_period_stats(&votes);
    assert_eq!(first, second);
    // The input is untouched
    assert_eq!(votes.len(), 2);
}

#[test]
fn test_weighted_votes_and_revenue() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let votes = vec![
        vote(alice, "Alice", "+233200000001", 5, 500),
        vote(bob, "Bob", "+233200000002", 1, 100),
        vote(alice, "Alice", "+233200000003", 2, 200),
    ];

    let stats = aggregate_period_stats(&votes);
    assert_eq!(stats.total_votes, 8);
    assert_eq!(stats.total_revenue, 800);
    assert_eq!(stats.total_voters, 3);

    let alice_stats = stats
        .per_nominee
        .iter()
        .find(|n| n.nominee_id == alice)
        .unwrap();
    assert_eq!(alice_stats.votes, 7);
    assert_eq!(alice_stats.revenue, 700);
}

#[test]
fn test_distinct_voters_counted_by_identifier() {
    let nominee = Uuid::new_v4();
    let votes = vec![
        vote(nominee, "Ama", "+233200000001", 1, 100),
        vote(nominee, "Ama", "+233200000001", 4, 400),
    ];

    let stats = aggregate_period_stats(&votes);
    assert_eq!(stats.total_votes, 5);
    assert_eq!(stats.total_voters, 1);
}

#[test]
fn test_stats_snapshot_serializes_for_audit_log() {
    // The reset log stores the closing stats as JSON; the round trip must
    // preserve every field.
    let nominee = Uuid::new_v4();
    let stats = aggregate_period_stats(&[vote(nominee, "Ama", "+233200000001", 2, 200)]);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_votes"], 2);
    assert_eq!(json["total_revenue"], 200);
    assert_eq!(json["total_voters"], 1);
    assert_eq!(json["per_nominee"][0]["name"], "Ama");

    let restored: towaba_server::period::PeriodStats = serde_json::from_value(json).unwrap();
    assert_eq!(restored, stats);
}

// ============================================================================
// Reset Actor Audit Values
// ============================================================================

#[test]
fn test_reset_actor_audit_representation() {
    let user_id = Uuid::new_v4();
    assert_eq!(
        ResetActor::User(user_id).as_db_value(),
        format!("user:{}", user_id)
    );
    assert_eq!(ResetActor::System.as_db_value(), "system");
}
