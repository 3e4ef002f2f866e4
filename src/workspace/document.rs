use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The serialized block graph, in the editor's JSON save format.
///
/// `{}` is a valid document and describes an empty workspace. Keys the core
/// does not understand (variables, editor state) are kept verbatim in `extra`.
///
/// Every chained block nests two levels deeper in the JSON, so documents are
/// read through [`Value`] and `next` chains are unrolled into a list before
/// the blocks are linked back together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkspaceDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlockStacks>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The top-level block stacks of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStacks {
    pub language_version: u32,
    pub blocks: Vec<Block>,
}

/// A single placed block and everything attached below or inside it.
///
/// Serialized in the editor's format: `type`, `id`, `x`, `y`, `enabled`,
/// `fields`, `inputs` and `next`, with `extra` merged alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub id: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub enabled: Option<bool>,
    pub fields: BTreeMap<String, Value>,
    pub inputs: BTreeMap<String, BlockConnection>,
    pub next: Option<BlockConnection>,
    pub extra: Map<String, Value>,
}

/// The keys of a block that do not hold other blocks.
#[derive(Deserialize)]
struct BlockHead {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// What is plugged into an input or `next` connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<Block>>,
}

impl BlockConnection {
    /// The real block if one is attached, else the shadow.
    pub fn target(&self) -> Option<&Block> {
        self.block.as_deref().or(self.shadow.as_deref())
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let mut object = into_object(value, "a block connection")?;
        Ok(Self {
            block: boxed_block(take_present(&mut object, "block"))?,
            shadow: boxed_block(take_present(&mut object, "shadow"))?,
        })
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Some(block) = &self.block {
            object.insert("block".to_string(), block.to_value());
        }
        if let Some(shadow) = &self.shadow {
            object.insert("shadow".to_string(), shadow.to_value());
        }
        Value::Object(object)
    }
}

impl WorkspaceDocument {
    /// Parses a saved document. Nesting depth is not limited: the parser grows
    /// its stack on demand instead of rejecting long stacks.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut extra = into_object(value, "a workspace document")?;
        let blocks = take_present(&mut extra, "blocks")
            .map(BlockStacks::from_value)
            .transpose()?;
        Ok(Self { blocks, extra })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Top-level stacks in reading order: by `y`, then `x`. Blocks without
    /// coordinates count as origin; ties keep document order.
    pub fn ordered_top_blocks(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self
            .blocks
            .as_ref()
            .map(|stacks| stacks.blocks.iter().collect())
            .unwrap_or_default();
        blocks.sort_by(|a, b| {
            let ay = a.y.unwrap_or(0.0);
            let by = b.y.unwrap_or(0.0);
            ay.total_cmp(&by)
                .then_with(|| a.x.unwrap_or(0.0).total_cmp(&b.x.unwrap_or(0.0)))
        });
        blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks
            .as_ref()
            .map(|stacks| stacks.blocks.iter().map(Block::subtree_size).sum())
            .unwrap_or(0)
    }
}

impl BlockStacks {
    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut object = into_object(value, "block stacks")?;
        let language_version = take_present(&mut object, "languageVersion")
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();
        let blocks = match take_present(&mut object, "blocks") {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(Block::from_value)
                .collect::<Result<_, _>>()?,
            Some(other) => return Err(invalid_type(&other, "a list of blocks")),
            None => Vec::new(),
        };
        Ok(Self {
            language_version,
            blocks,
        })
    }
}

impl Block {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            id: None,
            x: None,
            y: None,
            enabled: None,
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            next: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_input(mut self, name: &str, block: Block) -> Self {
        self.inputs.insert(
            name.to_string(),
            BlockConnection {
                block: Some(Box::new(block)),
                shadow: None,
            },
        );
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Appends `block` at the end of this block's `next` chain.
    pub fn then(self, block: Block) -> Self {
        let mut links = Vec::new();
        let mut last = self;
        while let Some(next) = last.next.as_mut().and_then(|c| c.block.take()) {
            links.push(last);
            last = *next;
        }
        last.next = Some(BlockConnection {
            block: Some(Box::new(block)),
            shadow: None,
        });
        relink(links, last)
    }

    /// Builds a block and its whole `next` chain from editor JSON.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut links = Vec::new();
        let (mut last, mut pending) = Block::split(value)?;
        while let Some(value) = pending {
            let (block, after) = Block::split(value)?;
            links.push(std::mem::replace(&mut last, block));
            pending = after;
        }
        Ok(relink(links, last))
    }

    /// One block with an empty `next` slot, plus the JSON of the block that
    /// belongs in it.
    fn split(value: Value) -> Result<(Self, Option<Value>), serde_json::Error> {
        let mut object = into_object(value, "a block")?;
        let inputs = match take_present(&mut object, "inputs") {
            Some(value) => into_object(value, "block inputs")?
                .into_iter()
                .map(|(name, value)| BlockConnection::from_value(value).map(|c| (name, c)))
                .collect::<Result<_, _>>()?,
            None => BTreeMap::new(),
        };
        let (next, pending) = match take_present(&mut object, "next") {
            Some(value) => {
                let mut connection = into_object(value, "a block connection")?;
                let pending = take_present(&mut connection, "block");
                let shadow = boxed_block(take_present(&mut connection, "shadow"))?;
                (Some(BlockConnection { block: None, shadow }), pending)
            }
            None => (None, None),
        };
        let head: BlockHead = serde_json::from_value(Value::Object(object))?;
        let block = Self {
            block_type: head.block_type,
            id: head.id,
            x: head.x,
            y: head.y,
            enabled: head.enabled,
            fields: head.fields,
            inputs,
            next,
            extra: head.extra,
        };
        Ok((block, pending))
    }

    /// Editor JSON for this block and its whole `next` chain.
    pub fn to_value(&self) -> Value {
        let links: Vec<&Block> = self.chain().collect();
        links
            .into_iter()
            .rev()
            .fold(None, |tail: Option<Value>, block| {
                let mut object = block.head_object();
                if let Some(next) = &block.next {
                    let mut connection = Map::new();
                    if let Some(tail) = tail {
                        connection.insert("block".to_string(), tail);
                    }
                    if let Some(shadow) = &next.shadow {
                        connection.insert("shadow".to_string(), shadow.to_value());
                    }
                    object.insert("next".to_string(), Value::Object(connection));
                }
                Some(Value::Object(object))
            })
            .unwrap_or(Value::Null)
    }

    fn head_object(&self) -> Map<String, Value> {
        let mut object = self.extra.clone();
        object.insert("type".to_string(), Value::String(self.block_type.clone()));
        if let Some(id) = &self.id {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(x) = self.x {
            object.insert("x".to_string(), Value::from(x));
        }
        if let Some(y) = self.y {
            object.insert("y".to_string(), Value::from(y));
        }
        if let Some(enabled) = self.enabled {
            object.insert("enabled".to_string(), Value::Bool(enabled));
        }
        if !self.fields.is_empty() {
            let fields = self.fields.iter().map(|(k, v)| (k.clone(), v.clone()));
            object.insert("fields".to_string(), Value::Object(fields.collect()));
        }
        if !self.inputs.is_empty() {
            let inputs = self.inputs.iter().map(|(k, c)| (k.clone(), c.to_value()));
            object.insert("inputs".to_string(), Value::Object(inputs.collect()));
        }
        object
    }

    pub fn id_or_type(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.block_type)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&Block> {
        self.inputs.get(name).and_then(BlockConnection::target)
    }

    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_ref().and_then(|c| c.block.as_deref())
    }

    /// This block followed by every block chained after it.
    pub fn chain(&self) -> impl Iterator<Item = &Block> {
        std::iter::successors(Some(self), |b| b.next_block())
    }

    fn subtree_size(&self) -> usize {
        self.chain()
            .map(|b| {
                1 + b
                    .inputs
                    .values()
                    .filter_map(|c| c.block.as_deref())
                    .map(Block::subtree_size)
                    .sum::<usize>()
            })
            .sum()
    }
}

/// Links `links` front to back through their `next` slots, ending with `last`.
/// Every link must already carry a `next` connection.
fn relink(links: Vec<Block>, last: Block) -> Block {
    links.into_iter().rev().fold(last, |tail, mut block| {
        if let Some(connection) = block.next.as_mut() {
            connection.block = Some(Box::new(tail));
        }
        block
    })
}

fn boxed_block(value: Option<Value>) -> Result<Option<Box<Block>>, serde_json::Error> {
    value.map(|v| Block::from_value(v).map(Box::new)).transpose()
}

/// Removes `key`, treating an explicit `null` as absent.
fn take_present(object: &mut Map<String, Value>, key: &str) -> Option<Value> {
    object.remove(key).filter(|value| !value.is_null())
}

fn into_object(value: Value, expected: &str) -> Result<Map<String, Value>, serde_json::Error> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(invalid_type(&other, expected)),
    }
}

fn invalid_type(value: &Value, expected: &str) -> serde_json::Error {
    let unexpected = match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    };
    <serde_json::Error as de::Error>::invalid_type(unexpected, &expected)
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Block::from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for BlockConnection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BlockConnection::from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for BlockStacks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BlockStacks::from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for WorkspaceDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WorkspaceDocument::from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}
