//! TUI Frontend (ratatui-based)
//!
//! This module implements the Frontend trait using ratatui for terminal rendering.
//! It wraps crossterm for event handling and terminal management.

pub mod app;
mod blocks;
mod carousel;
mod marquee;
mod media;
mod navbar;
pub mod page;
pub mod performance_stats;
pub mod reveal;
mod video;

pub use app::TuiFrontend;
