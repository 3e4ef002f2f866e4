//! Runs compiled programs to produce the robot's action list.
//!
//! Execution only sees the program it is handed. It has no access to the
//! network, the program store or the session, and any fault (including a
//! panic inside a parser-produced step) is turned into an empty, failed
//! result.

use crate::action::ActionCommand;
use crate::compiler::{Program, Step};
use crate::error::ExecutionError;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Upper bound on emitted actions per run.
pub const DEFAULT_MAX_ACTIONS: usize = 10_000;
/// Upper bound on executed steps (emits plus loop iterations) per run.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// The outcome of running a program.
///
/// When `success` is false, `actions` is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgramResult {
    pub actions: Vec<ActionCommand>,
    pub success: bool,
}

impl CompiledProgramResult {
    pub fn failed() -> Self {
        Self {
            actions: Vec::new(),
            success: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Executor {
    max_actions: usize,
    max_steps: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACTIONS)
    }
}

impl Executor {
    pub fn new(max_actions: usize) -> Self {
        Self {
            max_actions,
            max_steps: DEFAULT_MAX_STEPS.max(max_actions),
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs `program` once. Failure is total: either every action or none.
    pub fn run(&self, program: &Program) -> CompiledProgramResult {
        match self.try_run(program) {
            Ok(actions) => {
                debug!(serial = program.serial(), actions = actions.len(), "program executed");
                CompiledProgramResult {
                    actions,
                    success: true,
                }
            }
            Err(error) => {
                warn!(serial = program.serial(), %error, "program execution failed");
                CompiledProgramResult::failed()
            }
        }
    }

    /// Like [`Executor::run`], but reports why a run failed.
    pub fn try_run(&self, program: &Program) -> Result<Vec<ActionCommand>, ExecutionError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut run = Run {
                actions: Vec::new(),
                steps: 0,
            };
            self.execute(program.steps(), &mut run)?;
            Ok(run.actions)
        }));
        outcome.unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExecutionError::Panicked(message))
        })
    }

    fn execute(&self, steps: &[Step], run: &mut Run) -> Result<(), ExecutionError> {
        for step in steps {
            self.tick(run)?;
            match step {
                Step::Emit(command) => {
                    if run.actions.len() >= self.max_actions {
                        return Err(ExecutionError::BudgetExceeded {
                            limit: self.max_actions,
                        });
                    }
                    run.actions.push(command.clone());
                }
                Step::Repeat { times, body } => {
                    for _ in 0..*times {
                        self.tick(run)?;
                        self.execute(body, run)?;
                    }
                }
                Step::Fault(error) => return Err(error.clone().into()),
            }
        }
        Ok(())
    }

    fn tick(&self, run: &mut Run) -> Result<(), ExecutionError> {
        run.steps += 1;
        if run.steps > self.max_steps {
            return Err(ExecutionError::StepBudgetExceeded {
                limit: self.max_steps,
            });
        }
        Ok(())
    }
}

struct Run {
    actions: Vec<ActionCommand>,
    steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_loops_are_bounded_by_the_step_budget() {
        let program = Program::new(
            "m",
            "s",
            vec![Step::Repeat {
                times: u32::MAX,
                body: Vec::new(),
            }],
        );
        let executor = Executor::new(10).with_max_steps(1_000);
        assert_eq!(
            executor.try_run(&program),
            Err(ExecutionError::StepBudgetExceeded { limit: 1_000 })
        );
    }

    #[test]
    fn short_empty_loops_succeed() {
        let program = Program::new(
            "m",
            "s",
            vec![Step::Repeat {
                times: 3,
                body: Vec::new(),
            }],
        );
        assert_eq!(Executor::default().try_run(&program), Ok(Vec::new()));
    }
}
