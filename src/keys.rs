use crate::app::{App, MenuItem};
use crate::state::messages::LoadRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Free horizontal scroll; snaps to a round once idle
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.scroll_right(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.scroll_left(),

        // Round-by-round
        (MenuItem::Bracket, Char('L') | KeyCode::Tab, _) => guard.next_round(),
        (MenuItem::Bracket, Char('H') | KeyCode::BackTab, _) => guard.prev_round(),
        (MenuItem::Bracket, KeyCode::Home | Char('g'), _) => guard.first_round(),
        (MenuItem::Bracket, KeyCode::End | Char('G'), _) => guard.last_round(),

        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.scroll_up(),

        (MenuItem::Bracket, Char('R'), _) => {
            drop(guard);
            let _ = load_requests.send(LoadRequest::LoadBracket).await;
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

pub async fn handle_mouse(mouse_event: MouseEvent, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;
    if guard.state.active_tab != MenuItem::Bracket {
        return false;
    }
    let shift = mouse_event.modifiers.contains(KeyModifiers::SHIFT);
    match mouse_event.kind {
        MouseEventKind::ScrollRight => guard.scroll_right(),
        MouseEventKind::ScrollLeft => guard.scroll_left(),
        // Shift+wheel scrolls sideways
        MouseEventKind::ScrollDown if shift => guard.scroll_right(),
        MouseEventKind::ScrollUp if shift => guard.scroll_left(),
        MouseEventKind::ScrollDown => guard.scroll_down(),
        MouseEventKind::ScrollUp => guard.scroll_up(),
        _ => return false,
    }
    true
}
