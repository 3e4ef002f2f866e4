use super::program::Step;
use crate::action::ActionCommand;
use crate::error::CompileError;
use crate::schema::BaseType;
use crate::workspace::Block;
use ahash::AHashMap;
use serde_json::Value;

/// Language settings available to parsers.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub native_lang: String,
    pub foreign_lang: String,
}

/// Defines the contract for turning one robot block into a program step.
pub trait BlockParser: Send + Sync {
    /// The unnamespaced block type this parser handles.
    fn base_type(&self) -> &str;
    fn parse(&self, block: &Block, context: &ParseContext) -> Result<Step, CompileError>;
}

/// Reads a required string field.
pub fn require_str<'b>(block: &'b Block, field: &str) -> Result<&'b str, CompileError> {
    match block.field(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(CompileError::InvalidField {
            block_id: block.id_or_type().to_string(),
            field: field.to_string(),
            message: format!("expected text, found {}", other),
        }),
        None => Err(CompileError::MissingField {
            block_id: block.id_or_type().to_string(),
            field: field.to_string(),
        }),
    }
}

/// Reads an optional repeat-count field, falling back to `default`.
pub fn repeat_count(block: &Block, field: &str, default: u32) -> Result<u32, CompileError> {
    match block.field(field) {
        Some(value) => count_from_value(block, value),
        None => Ok(default),
    }
}

/// Interprets a JSON number (or numeric text) as a whole, non-negative count.
pub fn count_from_value(block: &Block, value: &Value) -> Result<u32, CompileError> {
    let invalid = |message: String| CompileError::InvalidRepeatCount {
        block_id: block.id_or_type().to_string(),
        message,
    };
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(format!("'{}' is not a number", value)))?;

    if !number.is_finite() || number < 0.0 || number.fract() != 0.0 {
        return Err(invalid(format!("{} is not a whole, non-negative number", number)));
    }
    if number > f64::from(u32::MAX) {
        return Err(invalid(format!("{} is too large", number)));
    }
    Ok(number as u32)
}

/// Validates a `#rrggbb` colour and lowercases it.
fn normalize_colour(block: &Block, raw: &str) -> Result<String, CompileError> {
    let hex = raw.strip_prefix('#').unwrap_or("");
    let valid = hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(CompileError::InvalidField {
            block_id: block.id_or_type().to_string(),
            field: "COLOR".to_string(),
            message: format!("'{}' is not a #rrggbb colour", raw),
        });
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

/// Defines the parsers for catalog-backed blocks. Each reads its dropdown field
/// as the primitive code; repeatable ones also honour a `TIMES` field.
macro_rules! define_primitive_parsers {
    ( $( ($struct_name:ident, $base:expr, $field:expr, $repeatable:expr) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl BlockParser for $struct_name {
                fn base_type(&self) -> &str { $base.as_str() }
                fn parse(&self, block: &Block, _context: &ParseContext) -> Result<Step, CompileError> {
                    let code = require_str(block, $field)?;
                    let command = ActionCommand::with_code($base.as_str(), code);
                    if $repeatable {
                        let times = repeat_count(block, "TIMES", 1)?;
                        Ok(Step::repeat_one(times, command))
                    } else {
                        Ok(Step::Emit(command))
                    }
                }
            }
        )*

        fn register_primitive_parsers(registry: &mut AHashMap<String, Box<dyn BlockParser>>) {
            $( registry.insert($base.as_str().to_string(), Box::new($struct_name)); )*
        }
    };
}

define_primitive_parsers! {
    (ActionParser, BaseType::Action, "ACTION", true),
    (ExtendedActionParser, BaseType::ExtendedAction, "EXTENDED_ACTION", true),
    (ExpressionParser, BaseType::Expression, "EXPRESSION", false),
    (SkillParser, BaseType::SkillHelper, "SKILL", false),
}

struct SpeakNativeParser;
impl BlockParser for SpeakNativeParser {
    fn base_type(&self) -> &str {
        BaseType::SpeakNative.as_str()
    }
    fn parse(&self, block: &Block, context: &ParseContext) -> Result<Step, CompileError> {
        let text = require_str(block, "TEXT")?;
        Ok(Step::Emit(ActionCommand::speech(
            self.base_type(),
            text,
            context.native_lang.as_str(),
        )))
    }
}

struct SpeakForeignParser;
impl BlockParser for SpeakForeignParser {
    fn base_type(&self) -> &str {
        BaseType::SpeakForeign.as_str()
    }
    fn parse(&self, block: &Block, context: &ParseContext) -> Result<Step, CompileError> {
        let text = require_str(block, "TEXT")?;
        let lang = match block.field("LANG") {
            Some(_) => require_str(block, "LANG")?,
            None => context.foreign_lang.as_str(),
        };
        Ok(Step::Emit(ActionCommand::speech(self.base_type(), text, lang)))
    }
}

struct SetIndicatorColorParser;
impl BlockParser for SetIndicatorColorParser {
    fn base_type(&self) -> &str {
        BaseType::SetIndicatorColor.as_str()
    }
    fn parse(&self, block: &Block, _context: &ParseContext) -> Result<Step, CompileError> {
        let colour = normalize_colour(block, require_str(block, "COLOR")?)?;
        Ok(Step::Emit(ActionCommand::with_code(self.base_type(), colour)))
    }
}

pub(super) fn register_default_parsers(registry: &mut AHashMap<String, Box<dyn BlockParser>>) {
    register_primitive_parsers(registry);
    registry.insert(
        BaseType::SpeakNative.as_str().to_string(),
        Box::new(SpeakNativeParser),
    );
    registry.insert(
        BaseType::SpeakForeign.as_str().to_string(),
        Box::new(SpeakForeignParser),
    );
    registry.insert(
        BaseType::SetIndicatorColor.as_str().to_string(),
        Box::new(SetIndicatorColorParser),
    );
}
