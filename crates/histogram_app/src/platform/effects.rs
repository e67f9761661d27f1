use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use histogram_core::{Effect, Msg};
use histogram_engine::{write_csv_export, EngineEvent, EngineEvents, EngineHandle, FetchSettings};
use histogram_logging::{hist_debug, hist_error, hist_info};

use super::app::AppEvent;

/// Where exports are written.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub output_dir: PathBuf,
    pub filename: String,
}

pub struct EffectRunner {
    engine: EngineHandle,
    export: ExportTarget,
    msg_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        settings: FetchSettings,
        export: ExportTarget,
        msg_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let (engine, events) = EngineHandle::spawn(settings);
        spawn_event_loop(events, msg_tx.clone());
        Self {
            engine,
            export,
            msg_tx,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchText { request_id, url } => {
                    hist_info!("FetchText request_id={} url={}", request_id, url);
                    self.engine.fetch(request_id, url);
                }
                Effect::ExportCsv { csv } => {
                    let target = &self.export;
                    let result = write_csv_export(&target.output_dir, &target.filename, &csv)
                        .map(|path| path.display().to_string())
                        .map_err(|err| {
                            hist_error!("Export to {:?} failed: {}", target.output_dir, err);
                            err.to_string()
                        });
                    let _ = self.msg_tx.send(AppEvent::Msg(Msg::ExportFinished { result }));
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => {
            hist_debug!(
                "request_id={} received_bytes={}",
                progress.request_id,
                progress.received_bytes
            );
            Msg::FetchProgress {
                request_id: progress.request_id,
                received_bytes: progress.received_bytes,
            }
        }
        EngineEvent::FetchCompleted { request_id, result } => match result {
            Ok(fetched) => Msg::FetchSucceeded {
                request_id,
                text: fetched.text,
                fetched_utc: Utc::now().to_rfc3339(),
            },
            Err(err) => Msg::FetchFailed {
                request_id,
                reason: err.kind.to_string(),
            },
        },
    }
}
