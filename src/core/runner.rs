//! Fail-fast execution of an ordered step sequence.
//!
//! Steps run strictly in order. A satisfied precondition moves the step
//! straight to `Skipped`; otherwise the action runs and the step ends in
//! `Done` or `Failed`. The first failed critical step aborts the run with
//! no rollback of earlier steps - they are individually idempotent and
//! safe to retry from the top.

use thiserror::Error;

use crate::core::errors::BootstrapError;
use crate::core::step::{Criticality, Step, StepState};
use crate::util::shell::{Shell, Status};

/// A critical step's action failed.
#[derive(Debug, Error)]
#[error("step `{step}` failed: {hint}")]
pub struct StepFailure {
    /// Name of the failing step.
    pub step: String,
    /// Operator-facing hint from the step definition.
    pub hint: String,
    #[source]
    pub source: BootstrapError,
}

/// Outcome of a full run: final state per step, in sequence order.
#[derive(Debug)]
pub struct RunReport {
    pub states: Vec<(String, StepState)>,
}

impl RunReport {
    /// Count of steps that actually executed their action.
    pub fn executed(&self) -> usize {
        self.states
            .iter()
            .filter(|(_, s)| matches!(s, StepState::Done | StepState::Failed))
            .count()
    }

    /// Count of steps skipped because their precondition held.
    pub fn skipped(&self) -> usize {
        self.states
            .iter()
            .filter(|(_, s)| *s == StepState::Skipped)
            .count()
    }
}

/// Run `steps` in order, aborting on the first critical failure.
pub fn run_steps(steps: Vec<Step>, shell: &Shell) -> Result<RunReport, StepFailure> {
    let mut report = RunReport { states: Vec::new() };

    for step in steps {
        let name = step.name().to_string();

        if step.is_satisfied() {
            tracing::debug!("precondition satisfied, skipping `{}`", name);
            shell.status(Status::Skipped, format!("{} (already satisfied)", name));
            shell.step_event(&name, "skipped", None);
            report.states.push((name, StepState::Skipped));
            continue;
        }

        shell.status(Status::Running, &name);
        shell.step_event(&name, "running", None);

        let criticality = step.criticality();
        let hint = step.on_failure().to_string();

        let spinner = shell.spinner(name.clone());
        let result = step.execute();
        spinner.finish_and_clear();

        match result {
            Ok(()) => {
                shell.status(Status::Done, &name);
                shell.step_event(&name, "done", None);
                report.states.push((name, StepState::Done));
            }
            Err(err) if criticality == Criticality::BestEffort => {
                tracing::warn!("best-effort step `{}` failed: {:#}", name, err);
                shell.warn(format!("{}: {} ({})", name, hint, err));
                shell.step_event(&name, "failed", Some(&err.to_string()));
                report.states.push((name, StepState::Failed));
            }
            Err(err) => {
                shell.step_event(&name, "failed", Some(&err.to_string()));
                report.states.push((name.clone(), StepState::Failed));
                return Err(StepFailure {
                    step: name,
                    hint,
                    source: err,
                });
            }
        }
    }

    Ok(report)
}

/// Resolve each step's skip predicate without running any action.
///
/// Used by `--dry-run` to print the plan. Preconditions are pure, so this
/// leaves the system untouched.
pub fn plan_steps(steps: &[Step]) -> Vec<(String, StepState)> {
    steps
        .iter()
        .map(|step| {
            let state = if step.is_satisfied() {
                StepState::Skipped
            } else {
                StepState::Pending
            };
            (step.name().to_string(), state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::util::process::CommandError;

    fn quiet_shell() -> Shell {
        Shell::for_tests()
    }

    fn failing() -> BootstrapError {
        BootstrapError::DependencyMissing("git".to_string())
    }

    #[test]
    fn test_all_steps_run_in_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut steps = Vec::new();
        for i in 0..3 {
            let order = Rc::clone(&order);
            steps.push(Step::new(format!("step-{}", i), "failed", move || {
                order.borrow_mut().push(i);
                Ok(())
            }));
        }

        let report = run_steps(steps, &quiet_shell()).unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        assert_eq!(report.executed(), 3);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_fail_fast_stops_later_steps() {
        let ran_after = Rc::new(Cell::new(false));
        let ran_after2 = Rc::clone(&ran_after);

        let steps = vec![
            Step::new("ok", "first failed", || Ok(())),
            Step::new("boom", "second failed", || Err(failing())),
            Step::new("never", "third failed", move || {
                ran_after2.set(true);
                Ok(())
            }),
        ];

        let err = run_steps(steps, &quiet_shell()).unwrap_err();
        assert_eq!(err.step, "boom");
        assert_eq!(err.hint, "second failed");
        assert!(!ran_after.get());
    }

    #[test]
    fn test_skip_on_presence_never_invokes_action() {
        let ran = Rc::new(Cell::new(false));
        let ran2 = Rc::clone(&ran);

        let steps = vec![Step::new("present", "failed", move || {
            ran2.set(true);
            Ok(())
        })
        .skip_if(|| true)];

        let report = run_steps(steps, &quiet_shell()).unwrap();
        assert!(!ran.get());
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn test_best_effort_failure_continues() {
        let ran_after = Rc::new(Cell::new(false));
        let ran_after2 = Rc::clone(&ran_after);

        let steps = vec![
            Step::new("soft", "soft failed", || {
                Err(BootstrapError::Command(CommandError::NonZero {
                    command: "false".to_string(),
                    code: Some(1),
                    stderr: String::new(),
                }))
            })
            .best_effort(),
            Step::new("next", "next failed", move || {
                ran_after2.set(true);
                Ok(())
            }),
        ];

        let report = run_steps(steps, &quiet_shell()).unwrap();
        assert!(ran_after.get());
        assert_eq!(report.executed(), 2);
    }

    #[test]
    fn test_plan_resolves_without_running() {
        let ran = Rc::new(Cell::new(false));
        let ran2 = Rc::clone(&ran);

        let steps = vec![
            Step::new("would-run", "failed", move || {
                ran2.set(true);
                Ok(())
            }),
            Step::new("satisfied", "failed", || Ok(())).skip_if(|| true),
        ];

        let plan = plan_steps(&steps);
        assert!(!ran.get());
        assert_eq!(plan[0], ("would-run".to_string(), StepState::Pending));
        assert_eq!(plan[1], ("satisfied".to_string(), StepState::Skipped));
    }
}
