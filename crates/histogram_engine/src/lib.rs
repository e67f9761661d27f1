//! Histogram engine: document fetch, text decoding and CSV export.
mod decode;
mod engine;
mod export;
mod fetch;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{fetch_text, EngineEvents, EngineHandle};
pub use export::{ensure_output_dir, write_csv_export, ExportError, DEFAULT_EXPORT_FILENAME};
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchProgress, FetchedText,
    RequestId,
};
