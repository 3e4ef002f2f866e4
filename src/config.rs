//! Layered settings: built-in defaults, an optional TOML file, then
//! `BLOCKBOT__*` environment variables.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub relay: RelaySettings,
    pub storage: StorageSettings,
    pub speech: SpeechSettings,
    pub executor: ExecutorSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelaySettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageSettings {
    pub namespace_prefix: String,
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeechSettings {
    pub native_lang: String,
    pub foreign_lang: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutorSettings {
    pub max_actions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            relay: RelaySettings {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: 10,
            },
            storage: StorageSettings {
                namespace_prefix: "program".to_string(),
                directory: "./programs".to_string(),
            },
            speech: SpeechSettings {
                native_lang: crate::compiler::DEFAULT_NATIVE_LANG.to_string(),
                foreign_lang: crate::compiler::DEFAULT_FOREIGN_LANG.to_string(),
            },
            executor: ExecutorSettings {
                max_actions: crate::executor::DEFAULT_MAX_ACTIONS,
            },
        }
    }
}

impl Settings {
    /// Loads settings. `file` must exist when given.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let builder = config::Config::builder()
            .set_default("relay.base_url", defaults.relay.base_url)?
            .set_default("relay.timeout_secs", defaults.relay.timeout_secs as i64)?
            .set_default("storage.namespace_prefix", defaults.storage.namespace_prefix)?
            .set_default("storage.directory", defaults.storage.directory)?
            .set_default("speech.native_lang", defaults.speech.native_lang)?
            .set_default("speech.foreign_lang", defaults.speech.foreign_lang)?
            .set_default("executor.max_actions", defaults.executor.max_actions as i64)?;

        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder,
        };

        let built = builder
            .add_source(config::Environment::with_prefix("BLOCKBOT").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }
}
