//! Period stats aggregation
//!
//! Pure fold over the vote records of a single period. No I/O here; callers
//! fetch the rows and persist the result.

use std::collections::{HashMap, HashSet};

use super::model::{NomineeStats, PeriodStats, PeriodVote};

/// Fold a period's successful votes into closing totals.
///
/// Distinct voters are counted by `voter_identifier`, not by vote row, so a
/// voter paying twice counts once. Revenue sums raw amounts with no currency
/// conversion. An empty slice yields all-zero stats.
pub fn aggregate_period_stats(votes: &[PeriodVote]) -> PeriodStats {
    if votes.is_empty() {
        return PeriodStats::empty();
    }

    let mut total_votes: i64 = 0;
    let mut total_revenue: i64 = 0;
    let mut voters: HashSet<&str> = HashSet::new();
    let mut per_nominee: HashMap<uuid::Uuid, NomineeStats> = HashMap::new();

    for vote in votes {
        total_votes += vote.vote_count as i64;
        total_revenue += vote.amount;
        voters.insert(vote.voter_identifier.as_str());

        let entry = per_nominee
            .entry(vote.nominee_id)
            .or_insert_with(|| NomineeStats {
                nominee_id: vote.nominee_id,
                name: vote.nominee_name.clone(),
                votes: 0,
                revenue: 0,
            });
        entry.votes += vote.vote_count as i64;
        entry.revenue += vote.amount;
    }

    let mut per_nominee: Vec<NomineeStats> = per_nominee.into_values().collect();
    // Standings order: most votes first, name as tie-breaker
    per_nominee.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));

    PeriodStats {
        total_votes,
        total_revenue,
        total_voters: voters.len() as i64,
        per_nominee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn vote(nominee_id: Uuid, name: &str, voter: &str, count: i32, amount: i64) -> PeriodVote {
        PeriodVote {
            nominee_id,
            nominee_name: name.to_string(),
            voter_identifier: voter.to_string(),
            vote_count: count,
            amount,
        }
    }

    #[test]
    fn test_empty_votes_yield_zero_stats() {
        let stats = aggregate_period_stats(&[]);
        assert_eq!(stats.total_votes, 0);
        assert_eq!(stats.total_revenue, 0);
        assert_eq!(stats.total_voters, 0);
        assert!(stats.per_nominee.is_empty());
    }

    #[test]
    fn test_totals_and_breakdown() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let votes = vec![
            vote(alice, "Alice", "+233200000001", 5, 500),
            vote(alice, "Alice", "+233200000002", 3, 300),
            vote(bob, "Bob", "+233200000001", 10, 1000),
        ];

        let stats = aggregate_period_stats(&votes);
        assert_eq!(stats.total_votes, 18);
        assert_eq!(stats.total_revenue, 1800);
        // Two distinct voters, one of them voted for both nominees
        assert_eq!(stats.total_voters, 2);

        assert_eq!(stats.per_nominee.len(), 2);
        assert_eq!(stats.per_nominee[0].name, "Bob");
        assert_eq!(stats.per_nominee[0].votes, 10);
        assert_eq!(stats.per_nominee[0].revenue, 1000);
        assert_eq!(stats.per_nominee[1].name, "Alice");
        assert_eq!(stats.per_nominee[1].votes, 8);
        assert_eq!(stats.per_nominee[1].revenue, 800);
    }

    #[test]
    fn test_distinct_voters_by_identifier_not_row() {
        let nominee = Uuid::new_v4();
        let votes = vec![
            vote(nominee, "Ama", "+233200000001", 1, 100),
            vote(nominee, "Ama", "+233200000001", 1, 100),
            vote(nominee, "Ama", "+233200000001", 1, 100),
        ];

        let stats = aggregate_period_stats(&votes);
        assert_eq!(stats.total_votes, 3);
        assert_eq!(stats.total_voters, 1);
    }

    #[test]
    fn test_idempotent() {
        let nominee = Uuid::new_v4();
        let votes = vec![
            vote(nominee, "Ama", "+233200000001", 2, 200),
            vote(nominee, "Ama", "+233200000002", 4, 400),
        ];

        let first = aggregate_period_stats(&votes);
        let second = aggregate_period_stats(&votes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_broken_by_name() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let votes = vec![
            vote(b, "Zed", "+233200000001", 5, 500),
            vote(a, "Ama", "+233200000002", 5, 500),
        ];

        let stats = aggregate_period_stats(&votes);
        assert_eq!(stats.per_nominee[0].name, "Ama");
        assert_eq!(stats.per_nominee[1].name, "Zed");
    }
}
