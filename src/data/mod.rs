//! Data layer - Pure state without UI coupling
//!
//! This module contains the site description and the page geometry derived
//! from it as pure data structures.
//! NO imports from frontend/ or any rendering code.
//! The TUI frontend reads from these structures to render.

pub mod page;
pub mod site;

pub use site::SiteContent;
