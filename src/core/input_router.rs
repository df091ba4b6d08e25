//! Input routing for the page
//!
//! Maps raw key and mouse events to a [`PageAction`]. Routing is a pure
//! lookup; [`crate::core::AppCore`] applies the action.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

/// Rows moved per arrow key / wheel notch
pub const LINE_STEP: i32 = 1;
pub const WHEEL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Quit,
    /// Close the menu if open, otherwise quit
    Escape,
    ScrollBy(i32),
    PageUp,
    PageDown,
    Home,
    End,
    JumpToSection(usize),
    NextSection,
    PrevSection,
    ToggleMenu,
    TogglePerfStats,
    /// Left click at a screen cell
    Click { x: u16, y: u16 },
    /// Pointer moved to a screen cell
    Hover { x: u16, y: u16 },
    None,
}

/// Route a key press to a page action
pub fn route_key(code: KeyCode, modifiers: KeyModifiers) -> PageAction {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => PageAction::Quit,
            _ => PageAction::None,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => PageAction::Quit,
        KeyCode::Esc => PageAction::Escape,
        KeyCode::Up | KeyCode::Char('k') => PageAction::ScrollBy(-LINE_STEP),
        KeyCode::Down | KeyCode::Char('j') => PageAction::ScrollBy(LINE_STEP),
        KeyCode::PageUp => PageAction::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => PageAction::PageDown,
        KeyCode::Home => PageAction::Home,
        KeyCode::End => PageAction::End,
        KeyCode::Char(c @ '1'..='9') => PageAction::JumpToSection(c as usize - '1' as usize),
        KeyCode::Tab => PageAction::NextSection,
        KeyCode::BackTab => PageAction::PrevSection,
        KeyCode::Char('m') | KeyCode::Char('M') => PageAction::ToggleMenu,
        KeyCode::Char('p') | KeyCode::Char('P') => PageAction::TogglePerfStats,
        _ => PageAction::None,
    }
}

/// Route a mouse event to a page action
pub fn route_mouse(kind: MouseEventKind, x: u16, y: u16) -> PageAction {
    match kind {
        MouseEventKind::ScrollUp => PageAction::ScrollBy(-WHEEL_STEP),
        MouseEventKind::ScrollDown => PageAction::ScrollBy(WHEEL_STEP),
        MouseEventKind::Down(MouseButton::Left) => PageAction::Click { x, y },
        MouseEventKind::Moved | MouseEventKind::Drag(_) => PageAction::Hover { x, y },
        _ => PageAction::None,
    }
}
