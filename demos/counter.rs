//! Counter demo.
//!
//! Up/Down (or +/-) change the count, `r` resets it, `q` or Ctrl+C quits.
//! Every change is also appended to a static log above the live frame.
//!
//! Set `EMBER_TUI_LOG=/path/to/file` to write render-loop traces there
//! (`RUST_LOG` controls the filter, default `debug`).

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use crossterm::event::KeyCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ember_tui::pipeline::{InputEvent, RenderOptions, render};
use ember_tui::primitives::{BoxStyle, Node, box_primitive, spacer, static_items, text};
use ember_tui::reactive::{Signal, batch};
use ember_tui::types::{BorderStyle, Dimension, Edges};

fn init_logging() {
    let Ok(path) = std::env::var("EMBER_TUI_LOG") else {
        return;
    };
    // The terminal belongs to the app; logs only ever go to the file.
    let Ok(file) = File::create(&path) else {
        eprintln!("cannot open log file {path}");
        return;
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}

fn view(count: &Signal<i64>, history: &Signal<Vec<String>>) -> Node {
    let value = count.get();
    let color = if value < 0 { "red" } else { "green" };
    let log = history.with(|entries| {
        static_items(entries.iter().map(|entry| Node::from(text(entry.as_str()).dim())))
    });

    box_primitive(
        BoxStyle::column(),
        [
            log,
            box_primitive(
                BoxStyle {
                    border: BorderStyle::Round,
                    border_color: Some("cyan".into()),
                    padding: Edges::symmetric(1, 0),
                    width: Dimension::Cells(32),
                    ..BoxStyle::row()
                },
                [
                    text("count").bold().into(),
                    spacer(),
                    text(value.to_string()).fg(color).into(),
                ],
            ),
            text("↑/↓ change · r reset · q quit").dim().into(),
        ],
    )
}

fn main() -> ExitCode {
    init_logging();

    let count = Signal::new(0_i64);
    let history = Signal::new(Vec::<String>::new());

    let app = {
        let (count, history) = (count.clone(), history.clone());
        match render(move || view(&count, &history), RenderOptions::default()) {
            Ok(app) => app,
            Err(err) => {
                eprintln!("failed to start: {err}");
                return ExitCode::FAILURE;
            }
        }
    };

    let handle = app.clone();
    app.set_input_handler(move |event| {
        let InputEvent::Key(key) = event else {
            return;
        };
        let delta = match key.code {
            KeyCode::Up | KeyCode::Char('+') => 1,
            KeyCode::Down | KeyCode::Char('-') => -1,
            KeyCode::Char('r') => -count.get_untracked(),
            KeyCode::Char('q') => {
                handle.unmount();
                return;
            }
            _ => return,
        };
        if delta == 0 {
            return;
        }
        // One frame for both writes.
        batch(|| {
            count.update(|n| *n += delta);
            let now = count.get_untracked();
            history.update(|log| log.push(format!("count {now:+} ({delta:+})")));
        });
    });

    match app.wait_until_exit() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
