use std::sync::{mpsc, Arc};
use std::thread;

use histogram_logging::{hist_error, hist_info, hist_warn};

use crate::decode::decode_text;
use crate::fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FetchError, FetchedText, RequestId};

enum EngineCommand {
    Fetch { request_id: RequestId, url: String },
}

/// Blocking front of the async engine. Commands go in, `EngineEvent`s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine's event channel.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(settings: FetchSettings) -> (Self, EngineEvents) {
        Self::spawn_with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn spawn_with_fetcher(fetcher: Arc<dyn Fetcher>) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    hist_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(fetcher.as_ref(), command, event_tx).await;
                });
            }
            hist_info!("Engine command channel closed; shutting down");
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn fetch(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            request_id,
            url: url.into(),
        });
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch { request_id, url } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = fetch_text(fetcher, request_id, &url, &sink).await;
            match &result {
                Ok(fetched) => hist_info!(
                    "Fetched request_id={} bytes={} encoding={} final_url={}",
                    request_id,
                    fetched.metadata.byte_len,
                    fetched.encoding_label,
                    fetched.metadata.final_url
                ),
                Err(err) => hist_warn!("Fetch request_id={} url={} failed: {}", request_id, url, err),
            }
            let _ = event_tx.send(EngineEvent::FetchCompleted { request_id, result });
        }
    }
}

/// Download `url` and decode the body to UTF-8.
pub async fn fetch_text(
    fetcher: &dyn Fetcher,
    request_id: RequestId,
    url: &str,
    sink: &dyn ProgressSink,
) -> Result<FetchedText, FetchError> {
    let output = fetcher.fetch(request_id, url, sink).await?;
    let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    Ok(FetchedText {
        text: decoded.text,
        encoding_label: decoded.encoding_label,
        metadata: output.metadata,
    })
}
