//! Rigup - workstation bootstrap for multi-repository development
//!
//! This crate provides the core library functionality for Rigup:
//! idempotent shell-profile wiring, presence probing for external tools,
//! and the fail-fast step runner that drives the bootstrap sequence.

pub mod core;
pub mod ops;
pub mod util;

pub use crate::core::errors::BootstrapError;
pub use crate::core::platform::ProfileKind;
pub use crate::core::runner::{run_steps, StepFailure};
pub use crate::core::step::{Criticality, Step, StepState};

pub use crate::util::context::GlobalContext;
pub use crate::util::profile::ProfileEditor;
