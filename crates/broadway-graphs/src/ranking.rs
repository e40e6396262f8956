//! Top-N ranking of shows by a selectable metric.

use broadway_common::{BroadwayError, RankingEntry, RankingMetric, RankingTable, Result, RevenueRecord};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Default, Clone, Copy)]
struct ShowTotals {
    gross: f64,
    records: usize,
}

impl ShowTotals {
    fn value(self, metric: RankingMetric) -> f64 {
        match metric {
            RankingMetric::AveragePerRecord => self.gross / self.records as f64,
            RankingMetric::Total => self.gross,
            RankingMetric::Count => self.records as f64,
        }
    }
}

/// Ranks shows by `metric` and keeps the `n` highest.
///
/// Ties keep the order in which shows first appear in `records`.
///
/// # Errors
///
/// [`BroadwayError::InvalidParameter`] when `n` is zero and
/// [`BroadwayError::EmptyDataset`] when `records` is empty.
#[instrument(skip(records), fields(records = records.len()))]
pub fn rank_shows(records: &[RevenueRecord], metric: RankingMetric, n: usize) -> Result<RankingTable> {
    if n == 0 {
        return Err(BroadwayError::invalid_parameter(
            "n",
            "the number of ranked shows must be positive",
        ));
    }
    if records.is_empty() {
        return Err(BroadwayError::empty_dataset("No records to rank"));
    }

    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, ShowTotals> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.show_name.as_str()).or_insert_with(|| {
            order.push(record.show_name.as_str());
            ShowTotals::default()
        });
        entry.gross += record.gross;
        entry.records += 1;
    }

    let mut entries: Vec<RankingEntry> = order
        .into_iter()
        .map(|show| RankingEntry {
            show_name: show.to_string(),
            value: totals[show].value(metric),
        })
        .collect();

    // sort_by is stable, so equal values stay in first-occurrence order
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(n);

    debug!(%metric, n, ranked = entries.len(), "Ranked shows");
    Ok(RankingTable { metric, entries })
}
