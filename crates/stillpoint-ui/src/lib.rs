//! Presentation layer: a projection of runtime events plus egui panels.
//!
//! Panels never touch the runtime directly. They render from [`state::UiState`]
//! and hand back an action enum for the app to apply.

pub mod format;
pub mod panels;
pub mod state;
pub mod theme;
