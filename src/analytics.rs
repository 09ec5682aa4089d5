//! Post-hoc aggregation over pool activity.
//!
//! Pure data transformation: takes the transaction and operation records
//! fetched from the pool resources and produces per-day, per-4-hour, and
//! per-account tallies with their averages and above-average subsets.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use itertools::Itertools;

use crate::horizon::{OperationRecord, TransactionRecord};

/// Aggregated pool activity statistics.
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub tx_per_day: BTreeMap<NaiveDate, u64>,
    pub unique_tx_per_day: BTreeMap<NaiveDate, u64>,
    pub tx_per_4h: BTreeMap<String, u64>,
    pub ops_per_account: BTreeMap<String, u64>,
    pub avg_tx_per_day: f64,
    pub avg_tx_per_4h: f64,
    pub avg_ops_per_account: f64,
    /// Buckets strictly above their average, sorted by count descending.
    pub above_avg_tx_per_day: Vec<(NaiveDate, u64)>,
    pub above_avg_tx_per_4h: Vec<(String, u64)>,
    pub above_avg_ops_per_account: Vec<(String, u64)>,
}

/// Label for the 4-hour bucket containing `time`, e.g.
/// `2024-03-07 08:00-11:59`.
pub fn four_hour_bucket(time: &DateTime<Utc>) -> String {
    let start_hour = (time.hour() / 4) * 4;
    format!(
        "{} {:02}:00-{:02}:59",
        time.date_naive(),
        start_hour,
        start_hour + 3
    )
}

/// Aggregate pool activity records into statistics.
pub fn analyze(transactions: &[TransactionRecord], operations: &[OperationRecord]) -> PoolStats {
    let tx_per_day: BTreeMap<NaiveDate, u64> = transactions
        .iter()
        .map(|tx| (tx.created_at.date_naive(), tx))
        .into_group_map()
        .into_iter()
        .map(|(day, group)| (day, group.len() as u64))
        .collect();

    let unique_tx_per_day: BTreeMap<NaiveDate, u64> = transactions
        .iter()
        .map(|tx| (tx.created_at.date_naive(), tx.hash.as_str()))
        .into_group_map()
        .into_iter()
        .map(|(day, hashes)| {
            let unique: HashSet<&str> = hashes.into_iter().collect();
            (day, unique.len() as u64)
        })
        .collect();

    let tx_per_4h: BTreeMap<String, u64> = transactions
        .iter()
        .map(|tx| (four_hour_bucket(&tx.created_at), tx))
        .into_group_map()
        .into_iter()
        .map(|(bucket, group)| (bucket, group.len() as u64))
        .collect();

    let ops_per_account: BTreeMap<String, u64> = operations
        .iter()
        .map(|op| (op.source_account.clone(), op))
        .into_group_map()
        .into_iter()
        .map(|(account, group)| (account, group.len() as u64))
        .collect();

    let avg_tx_per_day = average(&tx_per_day);
    let avg_tx_per_4h = average(&tx_per_4h);
    let avg_ops_per_account = average(&ops_per_account);

    PoolStats {
        above_avg_tx_per_day: above_average(&tx_per_day, avg_tx_per_day),
        above_avg_tx_per_4h: above_average(&tx_per_4h, avg_tx_per_4h),
        above_avg_ops_per_account: above_average(&ops_per_account, avg_ops_per_account),
        tx_per_day,
        unique_tx_per_day,
        tx_per_4h,
        ops_per_account,
        avg_tx_per_day,
        avg_tx_per_4h,
        avg_ops_per_account,
    }
}

fn average<K>(counts: &BTreeMap<K, u64>) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.values().sum::<u64>() as f64 / counts.len() as f64
}

fn above_average<K: Clone + Ord>(counts: &BTreeMap<K, u64>, avg: f64) -> Vec<(K, u64)> {
    counts
        .iter()
        .filter(|(_, &count)| count as f64 > avg)
        .map(|(k, &count)| (k.clone(), count))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(hash: &str, rfc3339: &str) -> TransactionRecord {
        serde_json::from_str(&format!(
            r#"{{"hash": "{}", "created_at": "{}"}}"#,
            hash, rfc3339
        ))
        .unwrap()
    }

    fn op(id: &str, account: &str, rfc3339: &str) -> OperationRecord {
        serde_json::from_str(&format!(
            r#"{{"id": "{}", "source_account": "{}", "type": "liquidity_pool_deposit", "created_at": "{}"}}"#,
            id, account, rfc3339
        ))
        .unwrap()
    }

    #[test]
    fn four_hour_buckets_cover_the_day() {
        let t = Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap();
        assert_eq!(four_hour_bucket(&t), "2024-03-07 08:00-11:59");

        let midnight = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
        assert_eq!(four_hour_bucket(&midnight), "2024-03-07 00:00-03:59");

        let late = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(four_hour_bucket(&late), "2024-03-07 20:00-23:59");
    }

    #[test]
    fn daily_counts_and_uniques() {
        let txs = vec![
            tx("aa", "2024-03-07T08:10:00Z"),
            tx("aa", "2024-03-07T09:10:00Z"),
            tx("bb", "2024-03-07T13:00:00Z"),
            tx("cc", "2024-03-08T01:00:00Z"),
        ];
        let stats = analyze(&txs, &[]);

        let day1 = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        assert_eq!(stats.tx_per_day[&day1], 3);
        assert_eq!(stats.tx_per_day[&day2], 1);
        assert_eq!(stats.unique_tx_per_day[&day1], 2);
        assert_eq!(stats.unique_tx_per_day[&day2], 1);
        assert!((stats.avg_tx_per_day - 2.0).abs() < f64::EPSILON);

        // Only day 1 (3 > 2.0) is above average.
        assert_eq!(stats.above_avg_tx_per_day, vec![(day1, 3)]);
    }

    #[test]
    fn operations_group_by_source_account() {
        let ops = vec![
            op("1", "GWHALE", "2024-03-07T08:00:00Z"),
            op("2", "GWHALE", "2024-03-07T09:00:00Z"),
            op("3", "GWHALE", "2024-03-07T10:00:00Z"),
            op("4", "GSMALL", "2024-03-07T11:00:00Z"),
        ];
        let stats = analyze(&[], &ops);

        assert_eq!(stats.ops_per_account["GWHALE"], 3);
        assert_eq!(stats.ops_per_account["GSMALL"], 1);
        assert!((stats.avg_ops_per_account - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.above_avg_ops_per_account,
            vec![("GWHALE".to_string(), 3)]
        );
    }

    #[test]
    fn above_average_sorts_by_count_descending() {
        let txs = vec![
            tx("a1", "2024-03-01T00:10:00Z"),
            tx("a2", "2024-03-01T00:20:00Z"),
            tx("a3", "2024-03-01T00:30:00Z"),
            tx("b1", "2024-03-02T00:10:00Z"),
            tx("b2", "2024-03-02T00:20:00Z"),
            tx("b3", "2024-03-02T00:30:00Z"),
            tx("b4", "2024-03-02T00:40:00Z"),
            tx("c1", "2024-03-03T00:10:00Z"),
        ];
        let stats = analyze(&txs, &[]);
        let counts: Vec<u64> = stats.above_avg_tx_per_day.iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![4, 3]);
    }

    #[test]
    fn empty_activity_yields_zero_averages() {
        let stats = analyze(&[], &[]);
        assert_eq!(stats.avg_tx_per_day, 0.0);
        assert!(stats.tx_per_day.is_empty());
        assert!(stats.above_avg_ops_per_account.is_empty());
    }
}
