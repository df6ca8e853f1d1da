//! High-level operations behind the CLI commands.

pub mod bootstrap;
pub mod doctor;

pub use bootstrap::{bootstrap, build_steps, BootstrapOptions};
pub use doctor::{doctor, format_report, CheckResult, DoctorOptions, DoctorReport};
