use histogram_logging::{hist_debug, hist_info, hist_warn};

use crate::csv::{has_unescaped_fields, to_csv};
use crate::{AppState, Effect, Msg, Status};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(raw) => {
            state.set_source_url(raw.trim().to_string());
            Vec::new()
        }
        Msg::TopKChanged(top_k) => {
            state.set_top_k(top_k);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let url = state.source_url().to_string();
            if !is_fetchable_url(&url) {
                hist_warn!("Submit rejected, not an http(s) url: {:?}", url);
                state.set_status(Status::InvalidUrl { input: url });
                return (state, Vec::new());
            }
            let request_id = state.begin_request();
            hist_info!("Submit request_id={} url={}", request_id, url);
            vec![Effect::FetchText { request_id, url }]
        }
        Msg::FetchSucceeded {
            request_id,
            text,
            fetched_utc,
        } => {
            if !state.is_current_request(request_id) {
                hist_debug!("Dropping stale response for request_id={}", request_id);
                return (state, Vec::new());
            }
            state.apply_text(&text, fetched_utc);
            Vec::new()
        }
        Msg::FetchProgress {
            request_id,
            received_bytes,
        } => {
            if state.is_current_request(request_id) {
                state.record_progress(received_bytes);
            }
            Vec::new()
        }
        Msg::FetchFailed { request_id, reason } => {
            if !state.is_current_request(request_id) {
                hist_debug!("Dropping stale failure for request_id={}", request_id);
                return (state, Vec::new());
            }
            hist_warn!("Fetch failed request_id={}: {}", request_id, reason);
            state.apply_failure(reason);
            Vec::new()
        }
        Msg::ExportClicked => match state.ranked() {
            Some(rows) => {
                if has_unescaped_fields(rows) {
                    hist_warn!("Export contains words with commas or quotes; CSV rows are not escaped");
                }
                vec![Effect::ExportCsv { csv: to_csv(rows) }]
            }
            None => {
                hist_debug!("Export ignored, no histogram yet");
                Vec::new()
            }
        },
        Msg::ExportFinished { result } => {
            let status = match result {
                Ok(path) => Status::Exported { path },
                Err(reason) => Status::ExportFailed { reason },
            };
            state.set_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_fetchable_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
