use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use histogram_core::{update, AppState, Msg};
use histogram_logging::{hist_info, hist_warn};

use super::config::{resolve_config_path, AppConfig};
use super::effects::{EffectRunner, ExportTarget};
use super::logging::{self, LogDestination};
use super::ui;
use super::ui::commands::{parse_command, Command, HELP_TEXT};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Help,
    InputError(String),
    Quit,
}

pub fn run_app() -> Result<()> {
    let config_path = resolve_config_path(std::env::args().skip(1));
    let config = AppConfig::load(&config_path)?;
    logging::initialize(
        LogDestination::from_flag(config.log_to_terminal),
        &config.log_file,
    );
    hist_info!("Starting with source {} top_k={}", config.source_url, config.top_k);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        config.fetch_settings(),
        ExportTarget {
            output_dir: config.output_dir.clone(),
            filename: config.export_filename.clone(),
        },
        event_tx.clone(),
    );
    spawn_input_reader(event_tx);

    let mut app = App {
        state: AppState::with_source(config.source_url, config.top_k),
        runner,
        out: io::stdout(),
    };
    app.print_lines(HELP_TEXT.lines().map(str::to_string));
    app.render_if_dirty();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch_msg(msg),
            AppEvent::Help => app.print_lines(HELP_TEXT.lines().map(str::to_string)),
            AppEvent::InputError(message) => {
                app.print_lines([message, "Type `help` for commands.".to_string()])
            }
            AppEvent::Quit => break,
        }
    }

    hist_info!("Exiting");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    out: io::Stdout,
}

impl App {
    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.render_if_dirty();
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            let view = self.state.view();
            self.print_lines(ui::render::render(&view));
        }
    }

    fn print_lines(&mut self, lines: impl IntoIterator<Item = String>) {
        let mut out = self.out.lock();
        let written = lines
            .into_iter()
            .try_for_each(|line| writeln!(out, "{line}"))
            .and_then(|()| writeln!(out))
            .and_then(|()| out.flush());
        if let Err(err) = written {
            hist_warn!("Failed to write to stdout: {}", err);
        }
    }
}

/// Reads commands from stdin on its own thread. EOF counts as quit.
fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => match parse_command(&line) {
                    Ok(Command::Dispatch(msg)) => AppEvent::Msg(msg),
                    Ok(Command::Help) => AppEvent::Help,
                    Ok(Command::Quit) => AppEvent::Quit,
                    Err(message) => AppEvent::InputError(message),
                },
                Err(err) => {
                    hist_warn!("Failed to read stdin: {}", err);
                    AppEvent::Quit
                }
            };
            let quit = matches!(event, AppEvent::Quit);
            if event_tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
