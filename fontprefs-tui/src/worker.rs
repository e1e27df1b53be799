//! Background worker thread: the font scan runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use fontprefs_core::{FontCatalog, SelectOption};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Enumerate font families and encodings. `selected_values` is echoed
    /// back so the answer is self-contained.
    FetchFontsData { selected_values: Vec<String> },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    FontsData {
        fonts: Vec<SelectOption>,
        encodings: Vec<SelectOption>,
        selected_values: Vec<String>,
    },
    Error {
        message: String,
        context: String,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    catalog: Box<dyn FontCatalog + Send>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("fontprefs-worker".into())
        .spawn(move || worker_loop(rx, tx, catalog))
}

fn worker_loop(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    catalog: Box<dyn FontCatalog + Send>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::FetchFontsData { selected_values }) => {
                let response = fetch_fonts_data(catalog.as_ref(), selected_values);
                if tx.send(response).is_err() {
                    break;
                }
            }
        }
    }
    debug!("font worker stopped");
}

fn fetch_fonts_data(catalog: &dyn FontCatalog, selected_values: Vec<String>) -> WorkerResponse {
    match catalog.font_families() {
        Ok(fonts) => {
            info!("font catalog: {} families", fonts.len());
            WorkerResponse::FontsData {
                fonts,
                encodings: catalog.encodings(),
                selected_values,
            }
        }
        Err(e) => {
            warn!("font catalog failed: {e}");
            WorkerResponse::Error {
                message: e.to_string(),
                context: "font catalog".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use fontprefs_core::StaticFontCatalog;

    #[test]
    fn fetch_answers_with_catalog_and_echoes_selection() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let catalog = StaticFontCatalog::new(["Georgia", "Arial", "arial"]);
        let handle = spawn_worker(cmd_rx, resp_tx, Box::new(catalog)).unwrap();

        cmd_tx
            .send(WorkerCommand::FetchFontsData {
                selected_values: vec!["Arial".into(), "Arial".into(), "UTF-8".into()],
            })
            .unwrap();
        let resp = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();

        match resp {
            WorkerResponse::FontsData {
                fonts,
                encodings,
                selected_values,
            } => {
                let names: Vec<&str> = fonts.iter().map(|f| f.value.as_str()).collect();
                assert_eq!(names, ["Arial", "Georgia"]);
                assert!(encodings.iter().any(|e| e.value == "UTF-8"));
                assert_eq!(selected_values.len(), 3);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn empty_catalog_reports_error() {
        let catalog = StaticFontCatalog::new(Vec::<String>::new());
        match fetch_fonts_data(&catalog, Vec::new()) {
            WorkerResponse::Error { context, .. } => assert_eq!(context, "font catalog"),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn worker_exits_when_commands_hang_up() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle =
            spawn_worker(cmd_rx, resp_tx, Box::new(StaticFontCatalog::new(["Arial"]))).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
