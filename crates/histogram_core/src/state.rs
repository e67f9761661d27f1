use crate::frequency::{FrequencyMap, RankedList, DEFAULT_TOP_K};
use crate::view_model::HistogramViewModel;

pub type RequestId = u64;

pub const DEFAULT_SOURCE_URL: &str = "https://www.terriblytinytales.com/test.txt";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Fetching,
    Ready,
    FetchFailed { reason: String },
    InvalidUrl { input: String },
    Exported { path: String },
    ExportFailed { reason: String },
}

/// Statistics of the last successfully processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Histogram {
    pub(crate) rows: RankedList,
    pub(crate) total_tokens: usize,
    pub(crate) distinct_tokens: usize,
    pub(crate) fetched_utc: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    source_url: String,
    top_k: usize,
    next_request_id: RequestId,
    pending_request: Option<RequestId>,
    /// Body bytes received for the pending request, once the engine reports any.
    received_bytes: Option<u64>,
    histogram: Option<Histogram>,
    status: Status,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_source(DEFAULT_SOURCE_URL, DEFAULT_TOP_K)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(url: impl Into<String>, top_k: usize) -> Self {
        Self {
            source_url: url.into(),
            top_k,
            next_request_id: 1,
            pending_request: None,
            received_bytes: None,
            histogram: None,
            status: Status::Idle,
            dirty: true,
        }
    }

    pub fn view(&self) -> HistogramViewModel {
        let (rows, total_tokens, distinct_tokens, fetched_utc) = match &self.histogram {
            Some(h) => (
                h.rows.clone(),
                h.total_tokens,
                h.distinct_tokens,
                Some(h.fetched_utc.clone()),
            ),
            None => (Vec::new(), 0, 0, None),
        };
        HistogramViewModel {
            source_url: self.source_url.clone(),
            top_k: self.top_k,
            can_export: self.histogram.is_some(),
            in_flight: self.pending_request.is_some(),
            received_bytes: self.received_bytes,
            rows,
            total_tokens,
            distinct_tokens,
            fetched_utc,
            status: self.status.clone(),
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn ranked(&self) -> Option<&RankedList> {
        self.histogram.as_ref().map(|h| &h.rows)
    }

    pub(crate) fn source_url(&self) -> &str {
        &self.source_url
    }

    pub(crate) fn set_source_url(&mut self, url: String) {
        self.source_url = url;
        self.dirty = true;
    }

    pub(crate) fn set_top_k(&mut self, top_k: usize) {
        self.top_k = top_k;
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
        self.dirty = true;
    }

    /// Allocates an id for a new fetch; earlier pending requests become stale.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request = Some(id);
        self.received_bytes = None;
        self.set_status(Status::Fetching);
        id
    }

    pub(crate) fn is_current_request(&self, request_id: RequestId) -> bool {
        self.pending_request == Some(request_id)
    }

    pub(crate) fn record_progress(&mut self, received_bytes: u64) {
        self.received_bytes = Some(received_bytes);
        self.dirty = true;
    }

    pub(crate) fn apply_text(&mut self, text: &str, fetched_utc: String) {
        let counts = FrequencyMap::from_text(text);
        self.histogram = Some(Histogram {
            rows: counts.rank(self.top_k),
            total_tokens: counts.total_tokens(),
            distinct_tokens: counts.len(),
            fetched_utc,
        });
        self.pending_request = None;
        self.received_bytes = None;
        self.set_status(Status::Ready);
    }

    pub(crate) fn apply_failure(&mut self, reason: String) {
        self.pending_request = None;
        self.received_bytes = None;
        self.set_status(Status::FetchFailed { reason });
    }
}
