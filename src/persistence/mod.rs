use crate::models::{Direction, Zone};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One audit row per cycle in which analysis completed
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub support: f64,
    pub resistance: f64,
    pub rsi: f64,
    pub sma: f64,
    pub confirmed: bool,
    pub zone: Zone,
    pub prediction: Direction,
    pub confidence: f64,
}

/// Append-only daily CSV audit logs.
///
/// A new file per day per symbol; fixed column order so downstream
/// tooling can rely on positions. Audit failures are surfaced to the
/// caller for logging but never abort a cycle.
pub struct AuditLogger {
    dir: PathBuf,
}

impl AuditLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Append the per-cycle analysis row for a symbol
    pub fn record_analysis(&self, symbol: &str, record: &AnalysisRecord) -> Result<()> {
        let date = record.timestamp.format("%Y-%m-%d");
        let path = self.dir.join(format!("{}_{}_analysis.csv", date, symbol));

        let mut writer = self.open_appender(
            &path,
            &[
                "datetime",
                "price",
                "support",
                "resistance",
                "rsi",
                "sma",
                "confirmed",
                "zone",
                "prediction",
                "confidence",
            ],
        )?;

        writer.write_record(&[
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.5}", record.price),
            format!("{:.5}", record.support),
            format!("{:.5}", record.resistance),
            format!("{:.2}", record.rsi),
            format!("{:.2}", record.sma),
            record.confirmed.to_string(),
            record.zone.to_string(),
            record.prediction.to_string(),
            format!("{:.4}", record.confidence),
        ])?;
        writer.flush()?;
        Ok(())
    }

    /// Append the per-cycle capital row: balance, equity and drawdown
    /// from the captured initial balance
    pub fn record_capital(
        &self,
        timestamp: DateTime<Utc>,
        balance: f64,
        equity: f64,
        initial_balance: f64,
    ) -> Result<()> {
        let date = timestamp.format("%Y-%m-%d");
        let path = self.dir.join(format!("{}_capital.csv", date));

        let drawdown_pct = if initial_balance > 0.0 {
            100.0 * (initial_balance - equity) / initial_balance
        } else {
            0.0
        };

        let mut writer = self.open_appender(
            &path,
            &["datetime", "balance", "equity", "drawdown_percent"],
        )?;
        writer.write_record(&[
            timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", balance),
            format!("{:.2}", equity),
            format!("{:.2}", drawdown_pct),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn open_appender(&self, path: &Path, header: &[&str]) -> Result<csv::Writer<std::fs::File>> {
        std::fs::create_dir_all(&self.dir)?;
        let is_new = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer.write_record(header)?;
        }
        Ok(writer)
    }
}
