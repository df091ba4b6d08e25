//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait that rendering frontends implement.
//! It provides a unified interface for event polling, rendering, and cleanup.

pub mod events;
pub mod tui;

use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// The Frontend trait separates rendering concerns from page logic. A
/// frontend turns its native input into `FrontendEvent`s and draws whatever
/// the core currently holds.
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events (keyboard, mouse, resize) converted to the
    /// frontend-agnostic `FrontendEvent` enum. Waits at most one frame.
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state
    ///
    /// Mutable because rendering records its own timing in the core's stats.
    fn render(&mut self, app: &mut dyn std::any::Any) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size in cells
    fn size(&self) -> (u16, u16);
}
