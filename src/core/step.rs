//! A single unit of the bootstrap sequence.
//!
//! Each step carries a human-readable name, a skip predicate, an action,
//! and a message shown when the action fails. Steps are built once at
//! orchestration-definition time and consumed exactly once per run.

use crate::core::errors::BootstrapError;

/// Lifecycle of a step during a run.
///
/// `Skipped`, `Done`, and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Skipped,
    Running,
    Done,
    Failed,
}

/// Whether a step failure aborts the whole run.
///
/// The shipped bootstrap marks every step `Critical`, matching the
/// original uniform-fatal behavior. `BestEffort` reports the failure and
/// continues with the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criticality {
    #[default]
    Critical,
    BestEffort,
}

/// One unit of the bootstrap sequence.
pub struct Step {
    name: String,
    on_failure: String,
    criticality: Criticality,
    precondition: Box<dyn Fn() -> bool>,
    action: Box<dyn FnOnce() -> Result<(), BootstrapError>>,
}

impl Step {
    /// Create a step that always runs (no skip predicate).
    pub fn new(
        name: impl Into<String>,
        on_failure: impl Into<String>,
        action: impl FnOnce() -> Result<(), BootstrapError> + 'static,
    ) -> Self {
        Step {
            name: name.into(),
            on_failure: on_failure.into(),
            criticality: Criticality::Critical,
            precondition: Box::new(|| false),
            action: Box::new(action),
        }
    }

    /// Set the skip predicate. Returning `true` means "already satisfied".
    ///
    /// The predicate must be side-effect free; it is re-evaluated from the
    /// live system on every run and may also be evaluated by `--dry-run`.
    pub fn skip_if(mut self, precondition: impl Fn() -> bool + 'static) -> Self {
        self.precondition = Box::new(precondition);
        self
    }

    /// Mark this step as best-effort (failure does not abort the run).
    pub fn best_effort(mut self) -> Self {
        self.criticality = Criticality::BestEffort;
        self
    }

    /// The step's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operator-facing message shown when the action fails.
    pub fn on_failure(&self) -> &str {
        &self.on_failure
    }

    /// Whether a failure of this step aborts the run.
    pub fn criticality(&self) -> Criticality {
        self.criticality
    }

    /// Evaluate the skip predicate against the live system.
    pub fn is_satisfied(&self) -> bool {
        (self.precondition)()
    }

    /// Consume the step and run its action.
    pub fn execute(self) -> Result<(), BootstrapError> {
        (self.action)()
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("criticality", &self.criticality)
            .finish_non_exhaustive()
    }
}
