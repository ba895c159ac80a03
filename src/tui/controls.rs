//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('n') | KeyCode::Enter => app.tick(),
        KeyCode::Up | KeyCode::Char('k') => app.sliders.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.sliders.select_next(),
        KeyCode::Right | KeyCode::Char('l') => app.sliders.nudge(1.0),
        KeyCode::Left | KeyCode::Char('h') => app.sliders.nudge(-1.0),
        KeyCode::Char('+' | '=') => app.speed_up(),
        KeyCode::Char('-') => app.speed_down(),
        KeyCode::Char('1') => app.switch_preset("residential_tou"),
        KeyCode::Char('2') => app.switch_preset("commercial_cpp"),
        KeyCode::Char('3') => app.switch_preset("industrial_rtp"),
        KeyCode::Char('4') => app.switch_preset("aggregator_rtp"),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}
