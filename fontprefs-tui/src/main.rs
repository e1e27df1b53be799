//! fontprefs TUI: the Fonts and Encoding page in a terminal.

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use fontprefs_core::config::{self, AppConfig};
use fontprefs_core::SystemFontCatalog;
use fontprefs_tui::app::AppState;
use fontprefs_tui::worker::{self, WorkerCommand};
use fontprefs_tui::{input, persistence, ui};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Config and file locations
    let config_dir = config::config_dir();
    let config = AppConfig::load(&config_dir.join("config.toml"))?;
    let _logger = init_logging(&config.log_level);
    let prefs_path = config.prefs_path(&config_dir);
    let state_path = config.state_path(&config_dir);
    let policy_path = config.policy_path(&config_dir);
    info!("starting fontprefs-tui {}", env!("CARGO_PKG_VERSION"));

    let prefs = persistence::load_preferences(&prefs_path, &policy_path);
    let persisted = persistence::load(&state_path);

    // Font worker
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(cmd_rx, resp_tx, Box::new(SystemFontCatalog::default()))
            .context("failed to spawn font worker")?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, prefs.store, config.strings());

    // Terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restoring the Fonts panel shows the page, which starts the fetch.
    persistence::apply(&mut app, persisted);

    let result = run_app(&mut terminal, &mut app);

    // Persist UI state and preferences
    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!("could not save UI state: {e:#}");
    }
    if let Err(e) =
        persistence::save_preferences(&app.prefs.borrow(), &prefs_path, prefs.save_on_exit)
    {
        warn!("could not save preferences: {e:#}");
    }

    // Stop the font worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Leave raw mode
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

/// Rotating log file under the cache dir. The terminal is in raw mode, so
/// nothing is duplicated to stderr.
fn init_logging(level: &str) -> Option<LoggerHandle> {
    let log_dir = config::log_dir();
    let logger = match Logger::try_with_env_or_str(level) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("invalid log level {level:?}: {e}");
            return None;
        }
    };
    logger
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("fontprefs")
                .suffix("log")
                .suppress_timestamp(),
        )
        .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
        .start()
        .map_err(|e| eprintln!("failed to start logging in {}: {e}", log_dir.display()))
        .ok()
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // Draw
        terminal.draw(|f| ui::draw(f, app))?;

        // Font data and preference changes, non-blocking
        app.drain_worker();
        app.drain_pref_changes();

        // 50ms poll keeps the loop near 20 frames a second
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // Quit requested by a key
        if !app.running {
            break;
        }
    }
    Ok(())
}
