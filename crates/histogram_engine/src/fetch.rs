use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use futures_util::StreamExt;
use histogram_logging::hist_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;

use crate::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchProgress, RequestId};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Redirect hops followed before giving up.
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Minimum growth of the body between two progress reports.
    pub progress_step: u64,
    /// Media types accepted from `Content-Type`. A response without the header is accepted.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            progress_step: 64 * 1024,
            allowed_content_types: [
                "text/plain",
                "text/html",
                "text/markdown",
                "text/csv",
                "application/octet-stream",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError>;
}

/// Decides when the received byte count is worth reporting.
#[derive(Debug)]
struct ProgressThrottle {
    step: u64,
    last_reported: Option<u64>,
}

impl ProgressThrottle {
    fn new(step: u64) -> Self {
        Self {
            step: step.max(1),
            last_reported: None,
        }
    }

    fn should_report(&mut self, received: u64) -> bool {
        let due = match self.last_reported {
            None => received >= self.step,
            Some(last) => received - last >= self.step,
        };
        if due {
            self.last_reported = Some(received);
        }
        due
    }

    /// The final count is reported unless it already was.
    fn should_report_final(&mut self, received: u64) -> bool {
        let due = self.last_reported != Some(received);
        self.last_reported = Some(received);
        due
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self, hops: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            // `previous` holds the original url plus every hop already taken.
            let taken = attempt.previous().len();
            if taken > limit {
                attempt.error("redirect limit exceeded")
            } else {
                hops.store(taken, Ordering::Relaxed);
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    /// Rejects the response before reading the body; returns its content type.
    fn check_headers(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.settings.max_bytes {
                return Err(self.too_large(declared));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = &content_type {
            if !accepts(&self.settings.allowed_content_types, ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.clone(),
                    },
                    "unsupported content type",
                ));
            }
        }
        Ok(content_type)
    }

    async fn read_body(
        &self,
        request_id: RequestId,
        response: Response,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        let capacity = response
            .content_length()
            .unwrap_or(0)
            .min(self.settings.max_bytes);
        let mut body = Vec::with_capacity(capacity as usize);
        let mut throttle = ProgressThrottle::new(self.settings.progress_step);
        let report = |received_bytes| {
            sink.emit(EngineEvent::Progress(FetchProgress {
                request_id,
                received_bytes,
            }))
        };

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.settings.max_bytes {
                return Err(self.too_large(received));
            }
            body.extend_from_slice(&chunk);
            if throttle.should_report(received) {
                report(received);
            }
        }

        let total = body.len() as u64;
        if throttle.should_report_final(total) {
            report(total);
        }
        Ok(body)
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let hops = Arc::new(AtomicUsize::new(0));
        let client = self.client(hops.clone())?;

        hist_debug!("GET {} request_id={}", parsed, request_id);
        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;
        let content_type = self.check_headers(&response)?;
        let final_url = response.url().to_string();
        let bytes = self.read_body(request_id, response, sink).await?;

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: hops.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }
}

/// Compares the media type only; parameters such as `charset` are ignored.
fn accepts(allowed: &[String], content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    allowed
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(media_type))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
