use crate::{RankedEntry, Status};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistogramViewModel {
    pub source_url: String,
    /// Limit applied at the next submit.
    pub top_k: usize,
    /// Bars in display order.
    pub rows: Vec<RankedEntry>,
    pub total_tokens: usize,
    pub distinct_tokens: usize,
    pub fetched_utc: Option<String>,
    pub status: Status,
    pub can_export: bool,
    /// A fetch is outstanding.
    pub in_flight: bool,
    /// Body bytes received so far by the outstanding fetch.
    pub received_bytes: Option<u64>,
}

impl HistogramViewModel {
    /// Largest count among the rows, used to scale bars.
    pub fn max_count(&self) -> u32 {
        self.rows.iter().map(|row| row.count).max().unwrap_or(0)
    }
}
