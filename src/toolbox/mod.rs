//! Block palettes.
//!
//! The default palette is shared and read-only. Every request returns an owned
//! deep copy, so a palette handed to the editor can be changed or dropped
//! without touching the baseline or any other copy.

use crate::schema::{BaseType, namespaced};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use tracing::debug;

/// Block types the default palette offers regardless of robot model.
pub const REPEAT_BLOCK: &str = "controls_repeat_ext";
pub const NUMBER_BLOCK: &str = "math_number";

/// A category tree describing the block palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolboxDefinition {
    pub kind: String,
    pub contents: Vec<ToolboxItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToolboxItem {
    Category {
        name: String,
        colour: String,
        contents: Vec<ToolboxItem>,
    },
    Block {
        #[serde(rename = "type")]
        block_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inputs: Option<serde_json::Value>,
    },
    Sep,
}

impl ToolboxItem {
    fn block(block_type: &str) -> Self {
        ToolboxItem::Block {
            block_type: block_type.to_string(),
            inputs: None,
        }
    }

    /// Every block type reachable from this item, depth first.
    pub fn block_types(&self) -> Vec<&str> {
        match self {
            ToolboxItem::Category { contents, .. } => {
                contents.iter().flat_map(ToolboxItem::block_types).collect()
            }
            ToolboxItem::Block { block_type, .. } => vec![block_type.as_str()],
            ToolboxItem::Sep => Vec::new(),
        }
    }
}

impl ToolboxDefinition {
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().filter_map(|item| match item {
            ToolboxItem::Category { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn category(&self, name: &str) -> Option<&ToolboxItem> {
        self.contents
            .iter()
            .find(|item| matches!(item, ToolboxItem::Category { name: n, .. } if n == name))
    }
}

static DEFAULT_TOOLBOX: LazyLock<ToolboxDefinition> = LazyLock::new(|| ToolboxDefinition {
    kind: "categoryToolbox".to_string(),
    contents: vec![
        ToolboxItem::Category {
            name: "Loops".to_string(),
            colour: "120".to_string(),
            contents: vec![ToolboxItem::Block {
                block_type: REPEAT_BLOCK.to_string(),
                inputs: Some(json!({
                    "TIMES": { "shadow": { "type": NUMBER_BLOCK, "fields": { "NUM": 10 } } }
                })),
            }],
        },
        ToolboxItem::Category {
            name: "Math".to_string(),
            colour: "230".to_string(),
            contents: vec![ToolboxItem::block(NUMBER_BLOCK)],
        },
    ],
});

static ROBOT_CATEGORY: LazyLock<ToolboxItem> = LazyLock::new(|| ToolboxItem::Category {
    name: "Robot".to_string(),
    colour: "290".to_string(),
    contents: BaseType::ALL
        .iter()
        .map(|base| ToolboxItem::block(base.as_str()))
        .collect(),
});

/// A fresh copy of the baseline palette.
pub fn default_toolbox() -> ToolboxDefinition {
    DEFAULT_TOOLBOX.clone()
}

/// The baseline palette plus one category holding `model_id`'s namespaced blocks.
pub fn toolbox_for_model(model_id: &str) -> ToolboxDefinition {
    let mut toolbox = default_toolbox();
    let mut category = ROBOT_CATEGORY.clone();
    namespace_entries(&mut category, model_id);
    toolbox.contents.push(category);

    debug!(model_id, categories = toolbox.contents.len(), "built toolbox");
    toolbox
}

fn namespace_entries(item: &mut ToolboxItem, model_id: &str) {
    match item {
        ToolboxItem::Category { contents, .. } => {
            for entry in contents {
                namespace_entries(entry, model_id);
            }
        }
        ToolboxItem::Block { block_type, .. } => {
            *block_type = namespaced(model_id, block_type);
        }
        ToolboxItem::Sep => {}
    }
}
