//! The explicit editing session: which robot is selected, the workspace being
//! edited, where programs are saved, and the generator bound to that robot.

use crate::catalog::Catalog;
use crate::compiler::{CodeGenerator, Program};
use crate::config::Settings;
use crate::dispatch::{DispatchOutcome, Dispatcher, RelayTransport};
use crate::error::{SessionError, StoreError};
use crate::executor::{CompiledProgramResult, Executor};
use crate::schema::{BlockTypeDefinition, build_schema};
use crate::store::{ProgramStore, program_key};
use crate::toolbox::{ToolboxDefinition, default_toolbox, toolbox_for_model};
use crate::workspace::{Workspace, WorkspaceDocument};
use tracing::{debug, info, warn};

/// The robot a session is currently talking to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotSelection {
    pub model_id: String,
    pub serial: String,
}

/// How a run attempt ended. Exactly one of these is reported per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoRobot,
    /// The bound generator targets a different robot than the selection.
    /// Both sides are `model_id/serial`.
    StaleBinding { bound: String, selected: String },
    /// Generating or executing the program failed; nothing was sent.
    CompileFailed,
    Dispatched(DispatchOutcome),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Dispatched(outcome) if outcome.is_success())
    }

    pub fn message(&self) -> String {
        match self {
            RunOutcome::NoRobot => "No robot is selected.".to_string(),
            RunOutcome::StaleBinding { .. } => {
                "The selected robot changed. Please run the program again.".to_string()
            }
            RunOutcome::CompileFailed => {
                "Something is wrong with this program. Check your blocks and try again."
                    .to_string()
            }
            RunOutcome::Dispatched(outcome) => outcome.message(),
        }
    }
}

pub struct Session<S: ProgramStore> {
    settings: Settings,
    store: S,
    workspace: Workspace,
    executor: Executor,
    selection: Option<RobotSelection>,
    generator: Option<CodeGenerator>,
}

impl<S: ProgramStore> Session<S> {
    pub fn new(settings: Settings, store: S) -> Self {
        let executor = Executor::new(settings.executor.max_actions);
        Self {
            settings,
            store,
            workspace: Workspace::new(),
            executor,
            selection: None,
            generator: None,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selection(&self) -> Option<&RobotSelection> {
        self.selection.as_ref()
    }

    pub fn generator(&self) -> Option<&CodeGenerator> {
        self.generator.as_ref()
    }

    /// Selects a robot and binds a fresh generator to it.
    pub fn select_robot(&mut self, model_id: &str, serial: &str) {
        self.selection = Some(RobotSelection {
            model_id: model_id.to_string(),
            serial: serial.to_string(),
        });
        self.rebind();
        info!(model_id, serial, "robot selected");
    }

    /// Changes the target serial without rebinding the generator.
    ///
    /// Until [`Session::rebind`] is called, runs are refused as stale.
    pub fn set_serial(&mut self, serial: &str) {
        if let Some(selection) = self.selection.as_mut() {
            selection.serial = serial.to_string();
        }
    }

    /// Binds a generator to the current selection.
    pub fn rebind(&mut self) {
        self.generator = self.selection.as_ref().map(|selection| {
            CodeGenerator::builder(&selection.model_id, &selection.serial)
                .with_languages(
                    &self.settings.speech.native_lang,
                    &self.settings.speech.foreign_lang,
                )
                .build()
        });
    }

    /// The block vocabulary for the selected model.
    pub fn schema(&self, catalog: &Catalog) -> Result<Vec<BlockTypeDefinition>, SessionError> {
        let selection = self.selection.as_ref().ok_or(SessionError::NoRobot)?;
        Ok(build_schema(&selection.model_id, catalog))
    }

    /// The palette for the selected model, or the default one without a robot.
    pub fn toolbox(&self) -> ToolboxDefinition {
        match &self.selection {
            Some(selection) => toolbox_for_model(&selection.model_id),
            None => default_toolbox(),
        }
    }

    fn storage_key(&self) -> Result<String, SessionError> {
        let selection = self.selection.as_ref().ok_or(SessionError::NoRobot)?;
        Ok(program_key(
            &self.settings.storage.namespace_prefix,
            &selection.model_id,
        ))
    }

    /// Persists the workspace under the selected model's key.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let key = self.storage_key()?;
        let document = self.workspace.serialize();
        let json = document.to_json().map_err(|source| StoreError::Json {
            key: key.clone(),
            source,
        })?;
        self.store.set(&key, json)?;
        debug!(key = %key, "saved workspace");
        Ok(())
    }

    /// Loads the selected model's saved workspace. Returns `false` (and leaves
    /// an empty workspace) when nothing was saved.
    pub fn restore(&mut self) -> Result<bool, SessionError> {
        let key = self.storage_key()?;
        let Some(json) = self.store.get(&key)? else {
            self.workspace.clear();
            return Ok(false);
        };
        let document = WorkspaceDocument::from_json(&json)
            .map_err(|source| StoreError::Json { key, source })?;
        self.workspace.load(document);
        Ok(true)
    }

    /// Generates the program for the current workspace with the bound generator.
    pub fn program(&self) -> Option<Program> {
        let generator = self.generator.as_ref()?;
        Some(generator.generate(&self.workspace.serialize()))
    }

    /// Generates and executes the current workspace.
    pub fn compile(&self) -> Option<CompiledProgramResult> {
        self.program().map(|program| self.executor.run(&program))
    }

    /// Compiles the workspace and sends it to the selected robot.
    ///
    /// Holding `&mut self` for the whole attempt keeps the workspace unchanged
    /// while the request is in flight.
    pub async fn run<T: RelayTransport>(&mut self, dispatcher: &Dispatcher<T>) -> RunOutcome {
        let (Some(selection), Some(generator)) = (&self.selection, &self.generator) else {
            return RunOutcome::NoRobot;
        };
        if generator.serial() != selection.serial || generator.model_id() != selection.model_id {
            let bound = format!("{}/{}", generator.model_id(), generator.serial());
            let selected = format!("{}/{}", selection.model_id, selection.serial);
            warn!(%bound, %selected, "refusing to run with a stale generator binding");
            return RunOutcome::StaleBinding { bound, selected };
        }

        let program = generator.generate(&self.workspace.serialize());
        let result = self.executor.run(&program);
        if !result.success {
            return RunOutcome::CompileFailed;
        }

        let serial = selection.serial.clone();
        RunOutcome::Dispatched(dispatcher.dispatch(&result.actions, &serial).await)
    }
}
