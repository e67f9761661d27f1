#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User entered a new source URL.
    UrlChanged(String),
    /// User changed how many ranked words to keep.
    TopKChanged(usize),
    /// User clicked Submit: fetch the source and rebuild the histogram.
    SubmitClicked,
    /// User clicked Export.
    ExportClicked,
    /// Engine delivered the decoded document for a request.
    FetchSucceeded {
        request_id: crate::RequestId,
        text: String,
        fetched_utc: String,
    },
    /// Engine received more of the response body.
    FetchProgress {
        request_id: crate::RequestId,
        received_bytes: u64,
    },
    /// Engine gave up on a request.
    FetchFailed {
        request_id: crate::RequestId,
        reason: String,
    },
    /// Export effect finished; `Ok` carries the written path.
    ExportFinished { result: Result<String, String> },
    /// Fallback for placeholder wiring.
    NoOp,
}
