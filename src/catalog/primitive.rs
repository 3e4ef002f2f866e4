use serde::{Deserialize, Deserializer, Serialize};

/// Display name and code substituted into an empty dropdown.
pub const PLACEHOLDER: &str = "???";

/// A named, coded unit of robot capability.
///
/// Identity is the `code`; `display_name` is what the palette shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Primitive {
    #[serde(rename = "name", alias = "displayName", alias = "display_name")]
    pub display_name: String,
    pub code: String,
}

impl Primitive {
    pub fn new(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            code: code.into(),
        }
    }

    /// The `("???", "???")` entry used when a collection is empty.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER, PLACEHOLDER)
    }

    /// Dropdown option pair in `(label, value)` order.
    pub fn as_option(&self) -> (String, String) {
        (self.display_name.clone(), self.code.clone())
    }
}

/// The four primitive collections available to one robot model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "flat_or_paged")]
    pub actions: Vec<Primitive>,
    #[serde(
        default,
        alias = "extendedActions",
        alias = "extended-actions",
        deserialize_with = "flat_or_paged"
    )]
    pub extended_actions: Vec<Primitive>,
    #[serde(default, deserialize_with = "flat_or_paged")]
    pub expressions: Vec<Primitive>,
    #[serde(default, deserialize_with = "flat_or_paged")]
    pub skills: Vec<Primitive>,
}

impl Catalog {
    /// Parses a catalog from JSON. Each category may be a plain list or a
    /// paged `{ "results": [...] }` object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
            && self.extended_actions.is_empty()
            && self.expressions.is_empty()
            && self.skills.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrimitiveList {
    Flat(Vec<Primitive>),
    Paged { results: Vec<Primitive> },
}

fn flat_or_paged<'de, D>(deserializer: D) -> Result<Vec<Primitive>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PrimitiveList::deserialize(deserializer)? {
        PrimitiveList::Flat(items) => items,
        PrimitiveList::Paged { results } => results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_and_paged_categories() {
        let json = r#"{
            "actions": [{"name": "Wave", "code": "wave"}],
            "extendedActions": {"count": 1, "results": [{"name": "Dance", "code": "dance_1"}]},
            "skills": {"results": []}
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.actions, vec![Primitive::new("Wave", "wave")]);
        assert_eq!(catalog.extended_actions[0].code, "dance_1");
        assert!(catalog.expressions.is_empty());
        assert!(catalog.skills.is_empty());
    }
}
