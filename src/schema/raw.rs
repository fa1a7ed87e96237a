//! Adapter from the serialized schema description to [`SchemaNode`].
//!
//! Accepts both the `describe()` spelling (`children`, `rules`, `valids`,
//! `flags.allowOnly`) and the newer one (`keys`, `allow`, `flags.only`,
//! `matches`). Unrecognised members are ignored.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{Child, Presence, SchemaKind, SchemaNode};

#[derive(Debug, Deserialize)]
pub(crate) struct RawSchema {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(default)]
    flags: RawFlags,
    #[serde(default, alias = "allow")]
    valids: Vec<Value>,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default, alias = "tests")]
    rules: Vec<RawRule>,
    #[serde(default, alias = "keys")]
    children: Option<RawChildren>,
    #[serde(default)]
    items: Vec<RawSchema>,
    #[serde(default, alias = "matches")]
    alternatives: Vec<RawAlternative>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlags {
    presence: Option<Presence>,
    #[serde(default, alias = "only")]
    allow_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Named { name: String },
    Bare(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChildren {
    Map(IndexMap<String, RawSchema>),
    List(Vec<RawChild>),
}

#[derive(Debug, Deserialize)]
struct RawChild {
    key: String,
    schema: RawSchema,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAlternative {
    Wrapped { schema: RawSchema },
    Bare(RawSchema),
}

impl RawSchema {
    /// `at` is the JSON-ish location used in error messages.
    pub(crate) fn into_node(self, at: &str) -> Result<SchemaNode, String> {
        let kind = match (self.reference, self.kind.as_deref()) {
            (Some(target), _) => SchemaKind::Reference { target, presence: self.flags.presence },
            (None, Some("object")) => {
                let children = match self.children {
                    None => Vec::new(),
                    Some(RawChildren::Map(map)) => map
                        .into_iter()
                        .map(|(key, schema)| {
                            let schema = schema.into_node(&format!("{at}.children.{key}"))?;
                            Ok(Child { key, schema })
                        })
                        .collect::<Result<_, String>>()?,
                    Some(RawChildren::List(list)) => list
                        .into_iter()
                        .map(|RawChild { key, schema }| {
                            let schema = schema.into_node(&format!("{at}.children.{key}"))?;
                            Ok(Child { key, schema })
                        })
                        .collect::<Result<_, String>>()?,
                };
                SchemaKind::Object { children }
            }
            (None, Some("array")) => {
                let items = self.items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| item.into_node(&format!("{at}.items[{i}]")))
                    .collect::<Result<_, _>>()?;
                SchemaKind::Array { items }
            }
            (None, Some("alternatives")) => {
                let matches = self.alternatives
                    .into_iter()
                    .enumerate()
                    .map(|(i, alt)| {
                        let schema = match alt {
                            RawAlternative::Wrapped { schema } => schema,
                            RawAlternative::Bare(schema) => schema,
                        };
                        schema.into_node(&format!("{at}.alternatives[{i}]"))
                    })
                    .collect::<Result<_, _>>()?;
                SchemaKind::Alternatives { matches }
            }
            (None, Some("string")) => SchemaKind::String,
            (None, Some("number")) => SchemaKind::Number,
            (None, Some("boolean")) => SchemaKind::Boolean,
            (None, Some("date")) => SchemaKind::Date,
            (None, Some(other)) => SchemaKind::Other(other.to_string()),
            (None, None) => return Err(format!("{at}: description has neither `type` nor `$ref`")),
        };

        let tests = self.rules
            .into_iter()
            .map(|rule| match rule {
                RawRule::Named { name } => name,
                RawRule::Bare(name) => name,
            })
            .collect();

        Ok(SchemaNode {
            kind,
            presence: self.flags.presence.unwrap_or_default(),
            allow_only: self.flags.allow_only,
            valids: self.valids,
            notes: self.notes,
            tests,
        })
    }
}
