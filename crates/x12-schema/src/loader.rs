//! Schema file loader
//!
//! Loads transaction schemas from JSON files so new transaction types are a
//! data change, not a code change.

use crate::model::{
    DataType, ElementRule, LoopSchema, LoopTrigger, SchemaNode, SegmentSchema, TransactionSchema,
};
use crate::registry::SchemaRegistry;
use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serializable schema format for loading from files
#[derive(Debug, Deserialize)]
struct SchemaFile {
    transaction_set_id: String,
    version: String,
    name: String,
    #[serde(default)]
    functional_id_code: String,
    #[serde(default)]
    nodes: Vec<NodeFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NodeFile {
    Segment(SegmentFile),
    Loop(LoopFile),
}

#[derive(Debug, Deserialize)]
struct SegmentFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mandatory: bool,
    #[serde(default = "default_max_occurs")]
    max_occurs: Option<usize>,
    #[serde(default)]
    elements: Vec<ElementFile>,
}

#[derive(Debug, Deserialize)]
struct LoopFile {
    id: String,
    #[serde(default)]
    name: String,
    trigger: TriggerFile,
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    max_occurs: Option<usize>,
    #[serde(default)]
    children: Vec<NodeFile>,
}

#[derive(Debug, Deserialize)]
struct TriggerFile {
    segment_id: String,
    #[serde(default)]
    qualifier_position: Option<usize>,
    #[serde(default)]
    qualifier_values: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ElementFile {
    position: usize,
    #[serde(default)]
    name: String,
    #[serde(default = "default_data_type")]
    data_type: String,
    #[serde(default = "default_min_length")]
    min_length: usize,
    #[serde(default = "default_max_length")]
    max_length: usize,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    code_set: Option<String>,
}

fn default_max_occurs() -> Option<usize> {
    Some(1)
}

fn default_data_type() -> String {
    "AN".to_string()
}

fn default_min_length() -> usize {
    1
}

fn default_max_length() -> usize {
    80
}

fn parse_data_type(raw: &str) -> Result<DataType> {
    match raw {
        "ID" => Ok(DataType::Id),
        "AN" => Ok(DataType::Alphanumeric),
        "DT" => Ok(DataType::Date),
        "TM" => Ok(DataType::Time),
        "N0" | "N" => Ok(DataType::Integer),
        "N2" | "R" => Ok(DataType::Decimal),
        other => Err(Error::InvalidFormat(format!("unknown data type: {other}"))),
    }
}

impl ElementFile {
    fn into_rule(self) -> Result<ElementRule> {
        Ok(ElementRule {
            position: self.position,
            name: self.name,
            data_type: parse_data_type(&self.data_type)?,
            min_length: self.min_length,
            max_length: self.max_length,
            required: self.required,
            code_set: self.code_set,
        })
    }
}

impl SegmentFile {
    fn into_schema(self) -> Result<SegmentSchema> {
        Ok(SegmentSchema {
            id: self.id,
            name: self.name,
            min_occurs: usize::from(self.mandatory),
            max_occurs: self.max_occurs,
            elements: self
                .elements
                .into_iter()
                .map(ElementFile::into_rule)
                .collect::<Result<_>>()?,
        })
    }
}

impl LoopFile {
    fn into_schema(self) -> Result<LoopSchema> {
        Ok(LoopSchema {
            id: self.id,
            name: self.name,
            trigger: LoopTrigger {
                segment_id: self.trigger.segment_id,
                qualifier_position: self.trigger.qualifier_position,
                qualifier_values: self.trigger.qualifier_values,
            },
            min_occurs: usize::from(self.mandatory),
            max_occurs: self.max_occurs,
            children: self
                .children
                .into_iter()
                .map(NodeFile::into_node)
                .collect::<Result<_>>()?,
        })
    }
}

impl NodeFile {
    fn into_node(self) -> Result<SchemaNode> {
        match self {
            NodeFile::Segment(s) => Ok(SchemaNode::Segment(s.into_schema()?)),
            NodeFile::Loop(l) => Ok(SchemaNode::Loop(l.into_schema()?)),
        }
    }
}

/// Loads transaction schemas from JSON files on disk
pub struct SchemaLoader {
    schema_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader with the given search paths.
    #[must_use]
    pub fn new(schema_paths: Vec<PathBuf>) -> Self {
        Self { schema_paths }
    }

    /// Parse a single schema file.
    pub fn load_file(&self, path: &Path) -> Result<TransactionSchema> {
        debug!(path = %path.display(), "loading schema file");
        let content = fs::read_to_string(path)?;
        let file: SchemaFile = serde_json::from_str(&content)?;

        let mut schema = TransactionSchema::new(
            file.transaction_set_id,
            file.version,
            file.name,
            file.functional_id_code,
        );
        schema.nodes = file
            .nodes
            .into_iter()
            .map(NodeFile::into_node)
            .collect::<Result<_>>()?;
        Ok(schema)
    }

    /// Load every `.json` schema in the search paths into a registry that is
    /// preloaded with the built-in schemas.
    pub fn load_all(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::with_builtin();
        for dir in &self.schema_paths {
            if !dir.is_dir() {
                return Err(Error::NotFound(dir.display().to_string()));
            }
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    let schema = self.load_file(&path)?;
                    info!(key = %schema.qualified_name(), "loaded schema from file");
                    registry.register(schema);
                }
            }
        }
        Ok(registry)
    }
}
