//! Core bootstrap model: steps, the runner, and platform selection.

pub mod errors;
pub mod platform;
pub mod runner;
pub mod step;
