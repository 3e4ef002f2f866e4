use serde::{Deserialize, Serialize};

/// One compilable block type, in the JSON shape the block editor consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeDefinition {
    #[serde(rename = "type")]
    pub block_type: String,
    pub message0: String,
    #[serde(default)]
    pub args0: Vec<BlockArg>,
    /// May be chained after another block.
    #[serde(default)]
    pub previous_statement: bool,
    /// May have another block chained after it.
    #[serde(default)]
    pub next_statement: bool,
    pub colour: u16,
    #[serde(default)]
    pub tooltip: String,
}

impl BlockTypeDefinition {
    pub fn arg(&self, name: &str) -> Option<&BlockArg> {
        self.args0.iter().find(|a| a.name() == name)
    }

    pub fn dropdown_options(&self, name: &str) -> Option<&[(String, String)]> {
        match self.arg(name)? {
            BlockArg::FieldDropdown { options, .. } => Some(options.as_slice()),
            _ => None,
        }
    }

    pub(crate) fn dropdown_options_mut(&mut self, name: &str) -> Option<&mut Vec<(String, String)>> {
        self.args0.iter_mut().find_map(|arg| match arg {
            BlockArg::FieldDropdown { name: n, options } if n.as_str() == name => Some(options),
            _ => None,
        })
    }
}

/// A single parameter slot of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockArg {
    FieldDropdown {
        name: String,
        /// `(label, value)` pairs.
        options: Vec<(String, String)>,
    },
    FieldNumber {
        name: String,
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<f64>,
    },
    FieldInput {
        name: String,
        text: String,
    },
    FieldColour {
        name: String,
        colour: String,
    },
}

impl BlockArg {
    pub fn name(&self) -> &str {
        match self {
            BlockArg::FieldDropdown { name, .. }
            | BlockArg::FieldNumber { name, .. }
            | BlockArg::FieldInput { name, .. }
            | BlockArg::FieldColour { name, .. } => name,
        }
    }
}
