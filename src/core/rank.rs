use crate::domain::model::{CategoryTable, Metric, RankedEntry, RankedList};
use crate::utils::error::{EtlError, Result};

/// Top `n` categories for one metric, largest first.
///
/// The sort is stable, so equal values keep the table's first-seen order.
/// Fewer than `n` categories returns all of them; `n == 0` is rejected.
pub fn rank_top(totals: &CategoryTable, metric: Metric, n: usize) -> Result<RankedList> {
    if n == 0 {
        return Err(EtlError::invalid_argument(
            "n",
            "ranking size must be a positive integer",
        ));
    }

    let mut entries: Vec<RankedEntry> = totals
        .iter()
        .map(|t| RankedEntry {
            category: t.category.clone(),
            value: t.value(metric),
        })
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(n);

    Ok(RankedList { metric, entries })
}

/// Ranks every metric with the same `n`, in `Metric::ALL` order.
pub fn rank_all(totals: &CategoryTable, n: usize) -> Result<Vec<RankedList>> {
    Metric::ALL
        .iter()
        .map(|&metric| rank_top(totals, metric, n))
        .collect()
}
