//! Descriptive statistics table for one account.

use crate::analyzers::types::{Stat, StatValue};
use crate::analyzers::utility::{mean, sum_counts};
use crate::record::AccountDataset;

pub const TOTAL_POSTS: &str = "Total de tweets";
pub const MEAN_ENGAGEMENT: &str = "Engagement promedio (%)";
pub const TOTAL_LIKES: &str = "Likes totales";
pub const TOTAL_RETWEETS: &str = "Retweets totales";
pub const TOTAL_REPLIES: &str = "Respuestas totales";

/// Row count, mean engagement over defined values, and interaction sums.
///
/// Always returns the five rows in the same order.
pub fn describe(dataset: &AccountDataset) -> Vec<Stat> {
    let engagement: Vec<f64> = dataset.records.iter().filter_map(|r| r.engagement).collect();
    let records = &dataset.records;

    vec![
        Stat {
            metric: TOTAL_POSTS,
            value: StatValue::Count(records.len() as u64),
        },
        Stat {
            metric: MEAN_ENGAGEMENT,
            value: StatValue::Mean(mean(&engagement)),
        },
        Stat {
            metric: TOTAL_LIKES,
            value: StatValue::Count(sum_counts(records.iter().map(|r| r.likes))),
        },
        Stat {
            metric: TOTAL_RETWEETS,
            value: StatValue::Count(sum_counts(records.iter().map(|r| r.retweets))),
        },
        Stat {
            metric: TOTAL_REPLIES,
            value: StatValue::Count(sum_counts(records.iter().map(|r| r.replies))),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{normalize, read_csv};
    use crate::record::{Account, EngagementRecord};

    fn row(engagement: Option<f64>, likes: Option<u64>, retweets: u64, replies: u64) -> EngagementRecord {
        EngagementRecord {
            engagement,
            likes,
            retweets: Some(retweets),
            replies: Some(replies),
            ..Default::default()
        }
    }

    fn counts(stats: &[Stat]) -> Vec<u64> {
        stats
            .iter()
            .filter_map(|s| match s.value {
                StatValue::Count(n) => Some(n),
                StatValue::Mean(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_labels_match_export_language() {
        let ds = AccountDataset::new(Account::Ppoohkt, vec![], vec![]);
        let metrics: Vec<_> = describe(&ds).iter().map(|s| s.metric).collect();
        assert_eq!(
            metrics,
            vec![
                "Total de tweets",
                "Engagement promedio (%)",
                "Likes totales",
                "Retweets totales",
                "Respuestas totales"
            ]
        );
    }

    #[test]
    fn test_fixed_order() {
        let ds = AccountDataset::new(Account::Ppoohkt, vec![], vec![]);
        let metrics: Vec<_> = describe(&ds).iter().map(|s| s.metric).collect();
        assert_eq!(
            metrics,
            vec![TOTAL_POSTS, MEAN_ENGAGEMENT, TOTAL_LIKES, TOTAL_RETWEETS, TOTAL_REPLIES]
        );
    }

    #[test]
    fn test_mean_ignores_nulls() {
        let ds = AccountDataset::new(
            Account::Ppoohkt,
            vec![],
            vec![row(Some(2.0), Some(1), 0, 0), row(None, Some(1), 0, 0), row(Some(4.0), None, 0, 0)],
        );
        let stats = describe(&ds);
        assert_eq!(stats[0].value, StatValue::Count(3));
        assert_eq!(stats[1].value, StatValue::Mean(Some(3.0)));
        assert_eq!(stats[2].value, StatValue::Count(2));
    }

    #[test]
    fn test_mean_undefined_without_values() {
        let ds = AccountDataset::new(Account::Pavelphoom, vec![], vec![row(None, None, 1, 1)]);
        assert_eq!(describe(&ds)[1].value, StatValue::Mean(None));
    }

    #[test]
    fn test_oversized_counts_do_not_panic() {
        let csv = "Fecha,Engagement (%),Likes,Retweets,Replies,Hashtags,Texto\n\
                   2024-01-01,1,1e20,18446744073709551615,1,,\n\
                   2024-01-02,1,1e20,18446744073709551615,1,,\n";
        let table = read_csv(csv.as_bytes(), "ppoohkt.csv").unwrap();
        let ds = normalize(Account::Ppoohkt, &table);
        assert_eq!(ds.records[0].likes, None);

        let stats = describe(&ds);
        assert_eq!(stats[2].value, StatValue::Count(0));
        assert_eq!(stats[3].value, StatValue::Count(u64::MAX));
        assert_eq!(stats[4].value, StatValue::Count(2));
    }

    #[test]
    fn test_sums_are_additive() {
        let left = vec![row(Some(1.0), Some(3), 1, 4), row(None, None, 2, 0)];
        let right = vec![row(Some(5.0), Some(7), 0, 9)];
        let mut both = left.clone();
        both.extend(right.clone());

        let l = counts(&describe(&AccountDataset::new(Account::Ppoohkt, vec![], left)));
        let r = counts(&describe(&AccountDataset::new(Account::Ppoohkt, vec![], right)));
        let b = counts(&describe(&AccountDataset::new(Account::Ppoohkt, vec![], both)));

        let summed: Vec<u64> = l.iter().zip(&r).map(|(x, y)| x + y).collect();
        assert_eq!(b, summed);
    }
}
