use serde::{Deserialize, Serialize};

/// One command the robot executes.
///
/// `action_type` is the block kind that produced it. Primitive invocations
/// carry `code`; speech carries `text` and `lang`; indicator control carries
/// the colour in `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCommand {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl ActionCommand {
    pub fn with_code(action_type: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            code: Some(code.into()),
            text: None,
            lang: None,
        }
    }

    pub fn speech(
        action_type: impl Into<String>,
        text: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            code: None,
            text: Some(text.into()),
            lang: Some(lang.into()),
        }
    }
}
