//! Core business logic layer
//!
//! This module contains page state, scrolling, input routing and the
//! background timers. NO imports from frontend/ or rendering code.
//! Core updates data structures in the data and widget layers, frontends
//! read and render.

pub mod app_core;
pub mod input_router;
pub mod navigation;
pub mod timers;

pub use app_core::{AppCore, BlockWidget};
pub use navigation::NAVBAR_HEIGHT;
pub use timers::SiteEvent;
