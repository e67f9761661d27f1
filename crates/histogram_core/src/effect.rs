#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Download the document at `url` and report back with `request_id`.
    FetchText {
        request_id: crate::RequestId,
        url: String,
    },
    /// Write the serialized histogram to the export file.
    ExportCsv { csv: String },
}
