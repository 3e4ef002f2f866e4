use super::{BlockArg, BlockTypeDefinition};
use std::sync::LazyLock;

const PRIMITIVE_HUE: u16 = 230;
const SPEECH_HUE: u16 = 160;
const INDICATOR_HUE: u16 = 20;

/// Languages offered by the foreign speech block, as `(label, code)`.
pub const FOREIGN_LANGUAGES: [(&str, &str); 4] = [
    ("English", "en"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Chinese", "zh"),
];

static TEMPLATES: LazyLock<Vec<BlockTypeDefinition>> = LazyLock::new(|| {
    vec![
        primitive("action", "ACTION", "do %1 %2 times", "Run a robot action", true),
        primitive(
            "extended_action",
            "EXTENDED_ACTION",
            "perform %1 %2 times",
            "Run an extended robot action",
            true,
        ),
        primitive("expression", "EXPRESSION", "show %1", "Show a facial expression", false),
        primitive("skill_helper", "SKILL", "use skill %1", "Invoke a robot skill", false),
        BlockTypeDefinition {
            block_type: "speak_native".to_string(),
            message0: "say %1".to_string(),
            args0: vec![BlockArg::FieldInput {
                name: "TEXT".to_string(),
                text: "Xin chào".to_string(),
            }],
            previous_statement: true,
            next_statement: true,
            colour: SPEECH_HUE,
            tooltip: "Speak in the robot's native language".to_string(),
        },
        BlockTypeDefinition {
            block_type: "speak_foreign".to_string(),
            message0: "say %1 in %2".to_string(),
            args0: vec![
                BlockArg::FieldInput {
                    name: "TEXT".to_string(),
                    text: "Hello".to_string(),
                },
                BlockArg::FieldDropdown {
                    name: "LANG".to_string(),
                    options: FOREIGN_LANGUAGES
                        .iter()
                        .map(|(label, code)| (label.to_string(), code.to_string()))
                        .collect(),
                },
            ],
            previous_statement: true,
            next_statement: true,
            colour: SPEECH_HUE,
            tooltip: "Speak in a foreign language".to_string(),
        },
        BlockTypeDefinition {
            block_type: "set_indicator_color".to_string(),
            message0: "set light to %1".to_string(),
            args0: vec![BlockArg::FieldColour {
                name: "COLOR".to_string(),
                colour: "#ff0000".to_string(),
            }],
            previous_statement: true,
            next_statement: true,
            colour: INDICATOR_HUE,
            tooltip: "Change the indicator light colour".to_string(),
        },
    ]
});

/// The shared, unnamespaced template set. Callers must clone before editing.
pub(super) fn templates() -> &'static [BlockTypeDefinition] {
    &TEMPLATES
}

fn primitive(
    base: &str,
    field: &str,
    message: &str,
    tooltip: &str,
    repeatable: bool,
) -> BlockTypeDefinition {
    let mut args0 = vec![BlockArg::FieldDropdown {
        name: field.to_string(),
        options: Vec::new(),
    }];
    if repeatable {
        args0.push(BlockArg::FieldNumber {
            name: "TIMES".to_string(),
            value: 1.0,
            min: Some(1.0),
            precision: Some(1.0),
        });
    }
    BlockTypeDefinition {
        block_type: base.to_string(),
        message0: message.to_string(),
        args0,
        previous_statement: true,
        next_statement: true,
        colour: PRIMITIVE_HUE,
        tooltip: tooltip.to_string(),
    }
}
