//! Per-model block vocabulary.
//!
//! A robot model gets its own namespaced copy of a fixed template set, with the
//! primitive dropdowns filled from the model's catalog. The shared templates
//! are never mutated; every call builds a fresh vocabulary.

mod definition;
mod templates;

pub use definition::*;
pub use templates::FOREIGN_LANGUAGES;

use crate::catalog::{Catalog, Primitive};
use tracing::debug;

/// The fixed set of block kinds every robot model exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Action,
    ExtendedAction,
    Expression,
    SkillHelper,
    SpeakNative,
    SpeakForeign,
    SetIndicatorColor,
}

impl BaseType {
    pub const ALL: [BaseType; 7] = [
        BaseType::Action,
        BaseType::ExtendedAction,
        BaseType::Expression,
        BaseType::SkillHelper,
        BaseType::SpeakNative,
        BaseType::SpeakForeign,
        BaseType::SetIndicatorColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::Action => "action",
            BaseType::ExtendedAction => "extended_action",
            BaseType::Expression => "expression",
            BaseType::SkillHelper => "skill_helper",
            BaseType::SpeakNative => "speak_native",
            BaseType::SpeakForeign => "speak_foreign",
            BaseType::SetIndicatorColor => "set_indicator_color",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == name)
    }

    /// Name of the catalog-backed dropdown field, for the four primitive kinds.
    pub fn dropdown_field(&self) -> Option<&'static str> {
        match self {
            BaseType::Action => Some("ACTION"),
            BaseType::ExtendedAction => Some("EXTENDED_ACTION"),
            BaseType::Expression => Some("EXPRESSION"),
            BaseType::SkillHelper => Some("SKILL"),
            _ => None,
        }
    }

    /// The catalog collection feeding this block's dropdown, if any.
    pub fn collection<'c>(&self, catalog: &'c Catalog) -> Option<&'c [Primitive]> {
        match self {
            BaseType::Action => Some(catalog.actions.as_slice()),
            BaseType::ExtendedAction => Some(catalog.extended_actions.as_slice()),
            BaseType::Expression => Some(catalog.expressions.as_slice()),
            BaseType::SkillHelper => Some(catalog.skills.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"<model_id>.<base_type>"`.
pub fn namespaced(model_id: &str, base: &str) -> String {
    format!("{}.{}", model_id, base)
}

/// Builds the namespaced block definitions for one robot model.
///
/// Empty primitive collections are backed by a single `("???", "???")`
/// option so no dropdown is ever empty. Catalog entries are otherwise passed
/// through as-is.
pub fn build_schema(model_id: &str, catalog: &Catalog) -> Vec<BlockTypeDefinition> {
    let placeholder = [Primitive::placeholder()];

    let definitions: Vec<BlockTypeDefinition> = templates::templates()
        .iter()
        .cloned()
        .map(|mut definition| {
            let base = BaseType::parse(&definition.block_type);
            definition.block_type = namespaced(model_id, &definition.block_type);

            if let Some(base) = base {
                if let (Some(field), Some(collection)) =
                    (base.dropdown_field(), base.collection(catalog))
                {
                    let collection = if collection.is_empty() {
                        &placeholder[..]
                    } else {
                        collection
                    };
                    if let Some(options) = definition.dropdown_options_mut(field) {
                        options.extend(collection.iter().map(Primitive::as_option));
                    }
                }
            }
            definition
        })
        .collect();

    debug!(
        model_id,
        block_types = definitions.len(),
        "built block schema"
    );
    definitions
}
