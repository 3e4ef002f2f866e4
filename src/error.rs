use thiserror::Error;

/// Errors that can occur while turning a single block into a program step.
///
/// These never escape the code generator: a failing block is compiled into a
/// fault step so that the whole program fails when it is executed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Block '{block_id}' has type '{type_name}', which is not part of the '{model_id}' vocabulary")]
    UnknownBlockType {
        block_id: String,
        type_name: String,
        model_id: String,
    },

    #[error("Block '{block_id}' is missing required field '{field}'")]
    MissingField { block_id: String, field: String },

    #[error("Block '{block_id}' field '{field}' is invalid: {message}")]
    InvalidField {
        block_id: String,
        field: String,
        message: String,
    },

    #[error("Block '{block_id}' has an invalid repeat count: {message}")]
    InvalidRepeatCount { block_id: String, message: String },
}

/// Errors raised while executing a compiled program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Program fault: {0}")]
    Fault(#[from] CompileError),

    #[error("Program exceeded the action budget of {limit} actions")]
    BudgetExceeded { limit: usize },

    #[error("Program exceeded the step budget of {limit} steps")]
    StepBudgetExceeded { limit: usize },

    #[error("Program panicked during execution: {0}")]
    Panicked(String),
}

/// Transport-level errors while talking to the command relay.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid relay URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay responded with HTTP {0}")]
    HttpStatus(u16),
}

/// Errors from the program store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored program under '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors that can occur when converting a custom catalog format into a `Catalog`.
#[derive(Error, Debug, Clone)]
pub enum CatalogConversionError {
    #[error("Invalid catalog data: {0}")]
    ValidationError(String),
}

/// Errors from session-level persistence.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No robot is selected")]
    NoRobot,

    #[error(transparent)]
    Store(#[from] StoreError),
}
