//! Result artifacts: the bootstrap INI record and the analytics exports.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analytics::PoolStats;
use crate::pool::PoolId;
use crate::tx::TxHash;

/// Write the `{TOKEN_CODE}_LP.ini` record of an accepted deposit: pool
/// identifier, transaction hash, and ledger number, for operator
/// reference.
pub fn write_lp_artifact(
    dir: &Path,
    token_code: &str,
    pool_id: &PoolId,
    hash: &TxHash,
    ledger: u32,
) -> std::io::Result<PathBuf> {
    let path = dir.join(format!("{}_LP.ini", token_code));
    let mut file = fs::File::create(&path)?;
    writeln!(file, "[{} LiquidityPool]", token_code)?;
    writeln!(file, "Pool ID = {}", pool_id)?;
    writeln!(file, "Tx Hash = {}", hash)?;
    writeln!(file, "Ledger = {}", ledger)?;
    info!(path = %path.display(), "bootstrap record written");
    Ok(path)
}

/// Writes one analytics run into a timestamped subdirectory.
pub struct AnalyticsExporter {
    output_dir: PathBuf,
    timestamp: String,
}

impl AnalyticsExporter {
    /// Create `<root>/analytics_<timestamp>_time_vol` for this run.
    pub fn create(root: &Path, now: DateTime<Utc>) -> std::io::Result<Self> {
        let timestamp = now.format("%Y%m%d_%H%M%S").to_string();
        let output_dir = root.join(format!("analytics_{}_time_vol", timestamp));
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            timestamp,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The full statistics table as CSV, section by section.
    pub fn write_csv(&self, stats: &PoolStats) -> std::io::Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("pool_stats_{}.csv", self.timestamp));
        let mut file = fs::File::create(&path)?;

        writeln!(file, "Day,Transactions,Unique Transactions")?;
        for (day, count) in &stats.tx_per_day {
            let unique = stats.unique_tx_per_day.get(day).copied().unwrap_or(0);
            writeln!(file, "{},{},{}", day, count, unique)?;
        }
        writeln!(file)?;
        writeln!(file, "Average Transactions per Day,{}", stats.avg_tx_per_day)?;
        writeln!(file)?;
        writeln!(file, "Above-Average Transactions per Day")?;
        for (day, count) in &stats.above_avg_tx_per_day {
            writeln!(file, "{},{}", day, count)?;
        }

        writeln!(file)?;
        writeln!(file, "Hours,Transactions")?;
        for (bucket, count) in &stats.tx_per_4h {
            writeln!(file, "{},{}", bucket, count)?;
        }
        writeln!(file)?;
        writeln!(
            file,
            "Average Transactions per 4Hours,{}",
            stats.avg_tx_per_4h
        )?;
        writeln!(file)?;
        writeln!(file, "Above-Average Transactions per 4Hours")?;
        for (bucket, count) in &stats.above_avg_tx_per_4h {
            writeln!(file, "{},{}", bucket, count)?;
        }

        writeln!(file)?;
        writeln!(file, "Account,Operations")?;
        for (account, count) in &stats.ops_per_account {
            writeln!(file, "{},{}", account, count)?;
        }
        writeln!(file)?;
        writeln!(
            file,
            "Average Operations per Account,{}",
            stats.avg_ops_per_account
        )?;
        writeln!(file)?;
        writeln!(file, "Above-Average Operations per Account")?;
        for (account, count) in &stats.above_avg_ops_per_account {
            writeln!(file, "{},{}", account, count)?;
        }

        info!(path = %path.display(), "analytics CSV written");
        Ok(path)
    }

    /// The above-average subsets as an INI section file, highest counts
    /// first.
    pub fn write_above_average_ini(&self, stats: &PoolStats) -> std::io::Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("above_average_{}.ini", self.timestamp));
        let mut file = fs::File::create(&path)?;

        writeln!(file, "[AboveAverageTransactionsPerDay]")?;
        for (day, count) in &stats.above_avg_tx_per_day {
            writeln!(file, "{}={}", day, count)?;
        }
        writeln!(file)?;
        writeln!(file, "[AboveAverageTransactionsPer4Hours]")?;
        for (bucket, count) in &stats.above_avg_tx_per_4h {
            writeln!(file, "{}={}", bucket, count)?;
        }
        writeln!(file)?;
        writeln!(file, "[AboveAverageOperationsPerAccount]")?;
        for (account, count) in &stats.above_avg_ops_per_account {
            writeln!(file, "{}={}", account, count)?;
        }

        info!(path = %path.display(), "above-average INI written");
        Ok(path)
    }
}
