use crate::action::ActionCommand;
use crate::error::CompileError;
use itertools::Itertools;
use std::fmt;

/// One instruction of a compiled block program.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Append a command to the action list.
    Emit(ActionCommand),
    /// Run `body` `times` times.
    Repeat { times: u32, body: Vec<Step> },
    /// A block that could not be compiled. Executing it fails the whole program.
    Fault(CompileError),
}

impl Step {
    pub(crate) fn repeat_one(times: u32, command: ActionCommand) -> Self {
        if times == 1 {
            Step::Emit(command)
        } else {
            Step::Repeat {
                times,
                body: vec![Step::Emit(command)],
            }
        }
    }

    fn count(&self) -> usize {
        match self {
            Step::Repeat { body, .. } => 1 + body.iter().map(Step::count).sum::<usize>(),
            _ => 1,
        }
    }

    fn has_fault(&self) -> bool {
        match self {
            Step::Fault(_) => true,
            Step::Repeat { body, .. } => body.iter().any(Step::has_fault),
            Step::Emit(_) => false,
        }
    }

    fn write_listing(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Step::Emit(command) => {
                let attributes = [
                    ("code", &command.code),
                    ("text", &command.text),
                    ("lang", &command.lang),
                ]
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={:?}", key, v)))
                .join(" ");
                writeln!(f, "{}emit {} {}", indent, command.action_type, attributes)
            }
            Step::Repeat { times, body } => {
                writeln!(f, "{}repeat {} times", indent, times)?;
                for step in body {
                    step.write_listing(f, depth + 1)?;
                }
                writeln!(f, "{}end", indent)
            }
            Step::Fault(error) => writeln!(f, "{}fault: {}", indent, error),
        }
    }
}

/// The output of the code generator: a self-contained list of steps that
/// builds the action list when executed, plus the robot it was compiled for.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    model_id: String,
    serial: String,
    steps: Vec<Step>,
}

impl Program {
    pub fn new(model_id: impl Into<String>, serial: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            model_id: model_id.into(),
            serial: serial.into(),
            steps,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The robot this program was generated for.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total number of steps, including those nested in repeats.
    pub fn step_count(&self) -> usize {
        self.steps.iter().map(Step::count).sum()
    }

    pub fn has_faults(&self) -> bool {
        self.steps.iter().any(Step::has_fault)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "program for robot {:?} (model {:?})",
            self.serial, self.model_id
        )?;
        if self.steps.is_empty() {
            return writeln!(f, "  (empty)");
        }
        for step in &self.steps {
            step.write_listing(f, 1)?;
        }
        Ok(())
    }
}
