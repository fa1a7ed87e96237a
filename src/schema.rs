//! Input model: a closed, strongly-typed view of a validation-schema node.
//!
//! The validation library's own representation is duck-typed and version
//! dependent; [`raw`] is the only code that knows about it. Everything past
//! this module matches on [`SchemaKind`].
pub mod raw;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub presence: Presence,
    /// "restrict to the literal set" flag
    pub allow_only: bool,
    /// explicit allowed literals, `null` included
    pub valids: Vec<Value>,
    pub notes: Vec<String>,
    /// names of the predicate checks attached to the node (e.g. `guid`)
    pub tests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object { children: Vec<Child> },
    Array { items: Vec<SchemaNode> },
    Alternatives { matches: Vec<SchemaNode> },
    String,
    Number,
    Boolean,
    Date,
    /// Named reference to another export; resolved away by discovery.
    /// `presence` is only set when the reference overrides the target's.
    Reference { target: String, presence: Option<Presence> },
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub key: String,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    #[default]
    Optional,
    Forbidden,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            presence: Presence::default(),
            allow_only: false,
            valids: Vec::new(),
            notes: Vec::new(),
            tests: Vec::new(),
        }
    }

    /// Read one exported schema description.
    pub fn from_description(export: &str, value: Value) -> Result<Self> {
        let invalid = |message: String| Error::InvalidSchema {
            export: export.to_string(),
            message,
        };
        let raw: raw::RawSchema = crate::path_de::from_value_with_path(value)
            .map_err(|e| invalid(e.to_string()))?;
        raw.into_node("$").map_err(invalid)
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    /// True iff the explicit-values set contains the `null` literal.
    pub fn is_nullable(&self) -> bool {
        self.valids.iter().any(Value::is_null)
    }

    pub fn has_test(&self, name: &str) -> bool {
        self.tests.iter().any(|t| t == name)
    }

    /// The discriminant as the validation library spells it.
    pub fn kind_tag(&self) -> &str {
        match &self.kind {
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Alternatives { .. } => "alternatives",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Reference { .. } => "reference",
            SchemaKind::Other(tag) => tag,
        }
    }
}
