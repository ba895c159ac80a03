//! Live terminal UI: an interactive presenter for the engine.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Slider presenter and application state.
pub mod runtime;
mod style;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::error::SimError;
use runtime::App;

/// Failure to launch or drive the terminal UI.
#[derive(Error, Debug)]
pub enum TuiError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
}

/// Launches the TUI event loop for the given scenario.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit.
///
/// # Errors
///
/// Returns [`TuiError::Sim`] if the scenario cannot be started and
/// [`TuiError::Terminal`] if the terminal cannot be set up or drawn.
pub fn run(scenario: &ScenarioConfig) -> Result<(), TuiError> {
    let mut app = App::new(scenario.clone(), "custom")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
    };

    let result = event_loop(&mut terminal, &mut app);

    // Always restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result.map_err(TuiError::from)
}

/// Core event loop: poll input, auto-advance when enabled, draw.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        let timeout = Duration::from_millis(app.tick_interval_ms());
        let deadline = app.last_tick + timeout;
        let poll_timeout = deadline.saturating_duration_since(Instant::now());

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }

        if app.last_tick.elapsed() >= timeout {
            if !app.paused {
                app.tick();
            }
            app.last_tick = Instant::now();
        }
    }
}
