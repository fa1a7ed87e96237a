//! Discovery: pick the `…Schema` exports, name them, resolve references.
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::naming::{canonical_name, factory_export, name_note, schema_export};
use crate::schema::{SchemaKind, SchemaNode};

/// Export name → exported value, in source order.
pub type Exports = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchema {
    pub name: String,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Sorted by name; every schema carries its `type:<name>` note.
    pub schemas: Vec<NamedSchema>,
    /// Every export name, schema or not.
    pub exported: Vec<String>,
    /// Names whose `<Name>Factory` companion is exported.
    pub factories: Vec<String>,
}

impl Discovery {
    pub fn has_factory(&self, name: &str) -> bool {
        self.factories.iter().any(|f| f == name)
    }

    /// A type is coercible when its `<Name>Schema` export exists.
    pub fn is_coercible(&self, name: &str) -> bool {
        let export = schema_export(name);
        self.exported.iter().any(|e| *e == export)
    }
}

/// Parse the export map produced by dumping the schema module.
pub fn read_exports(src: &str) -> Result<Exports> {
    crate::path_de::from_str_with_path(src)
}

pub fn discover(exports: &Exports) -> Result<Discovery> {
    let exported: Vec<String> = exports.keys().cloned().collect();

    // 1) parse + annotate
    let mut annotated: IndexMap<String, (String, SchemaNode)> = IndexMap::new();
    for (export, value) in exports {
        let Some(name) = canonical_name(export) else { continue };
        let mut schema = SchemaNode::from_description(export, value.clone())?;
        annotate(&mut schema, name);
        annotated.insert(export.clone(), (name.to_string(), schema));
    }

    // 2) resolve references against the annotated set
    let mut schemas = Vec::with_capacity(annotated.len());
    for (export, (name, schema)) in &annotated {
        let mut stack = vec![export.clone()];
        let schema = resolve(schema.clone(), export, &annotated, &mut stack)?;
        schemas.push(NamedSchema { name: name.clone(), schema });
    }
    schemas.sort_by(|a, b| a.name.cmp(&b.name));

    let factories: Vec<String> = schemas
        .iter()
        .map(|s| s.name.clone())
        .filter(|name| exports.contains_key(&factory_export(name)))
        .collect();

    debug!(
        exports = exported.len(),
        schemas = schemas.len(),
        factories = factories.len(),
        "discovered schemas"
    );

    Ok(Discovery { schemas, exported, factories })
}

/// Set-union the name note in; running twice changes nothing.
pub fn annotate(schema: &mut SchemaNode, name: &str) {
    let note = name_note(name);
    if !schema.notes.contains(&note) {
        schema.notes.push(note);
    }
}

fn resolve(
    node: SchemaNode,
    root: &str,
    annotated: &IndexMap<String, (String, SchemaNode)>,
    stack: &mut Vec<String>,
) -> Result<SchemaNode> {
    let SchemaNode { kind, presence, allow_only, valids, notes, tests } = node;
    let kind = match kind {
        SchemaKind::Reference { target, presence: override_presence } => {
            let key = if annotated.contains_key(&target) { target.clone() } else { schema_export(&target) };
            let Some((_, target_schema)) = annotated.get(&key) else {
                return Err(Error::UnresolvedReference { export: root.to_string(), target });
            };
            if stack.contains(&key) {
                let mut chain = stack.clone();
                chain.push(key);
                return Err(Error::CyclicReference { chain: chain.join(" → ") });
            }

            stack.push(key);
            let mut resolved = resolve(target_schema.clone(), root, annotated, stack)?;
            stack.pop();

            if let Some(p) = override_presence {
                resolved.presence = p;
            }
            resolved.allow_only |= allow_only;
            for v in valids {
                if !resolved.valids.contains(&v) {
                    resolved.valids.push(v);
                }
            }
            for note in notes {
                if !resolved.notes.contains(&note) {
                    resolved.notes.push(note);
                }
            }
            for test in tests {
                if !resolved.tests.contains(&test) {
                    resolved.tests.push(test);
                }
            }
            return Ok(resolved);
        }
        SchemaKind::Object { children } => SchemaKind::Object {
            children: children
                .into_iter()
                .map(|mut child| {
                    child.schema = resolve(child.schema, root, annotated, stack)?;
                    Ok(child)
                })
                .collect::<Result<_>>()?,
        },
        SchemaKind::Array { items } => SchemaKind::Array {
            items: items
                .into_iter()
                .map(|item| resolve(item, root, annotated, stack))
                .collect::<Result<_>>()?,
        },
        SchemaKind::Alternatives { matches } => SchemaKind::Alternatives {
            matches: matches
                .into_iter()
                .map(|m| resolve(m, root, annotated, stack))
                .collect::<Result<_>>()?,
        },
        leaf => leaf,
    };
    Ok(SchemaNode { kind, presence, allow_only, valids, notes, tests })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Presence;
    use serde_json::json;

    fn exports(value: Value) -> Exports {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn only_schema_suffixed_exports_are_discovered() {
        let d = discover(&exports(json!({
            "Foo": { "type": "string" },
            "FruitSchema": { "type": "string" },
            "helper": 42
        }))).unwrap();

        assert_eq!(d.schemas.len(), 1);
        assert_eq!(d.schemas[0].name, "Fruit");
        assert_eq!(d.exported, ["Foo", "FruitSchema", "helper"]);
    }

    #[test]
    fn annotation_is_idempotent() {
        let d = discover(&exports(json!({
            "JobSchema": { "type": "object", "notes": ["type:Job"], "children": { "title": { "type": "string" } } }
        }))).unwrap();
        assert_eq!(d.schemas[0].schema.notes, ["type:Job"]);

        let mut schema = d.schemas[0].schema.clone();
        annotate(&mut schema, "Job");
        assert_eq!(schema.notes, ["type:Job"]);
    }

    #[test]
    fn factories_are_recorded_per_name() {
        let d = discover(&exports(json!({
            "PersonSchema": { "type": "object" },
            "PersonFactory": {},
            "PetSchema": { "type": "object" }
        }))).unwrap();
        assert_eq!(d.factories, ["Person"]);
        assert!(d.has_factory("Person"));
        assert!(!d.has_factory("Pet"));
        assert!(d.is_coercible("Pet"));
        assert!(!d.is_coercible("Uuid"));
    }

    #[test]
    fn schemas_come_out_sorted_by_name() {
        let d = discover(&exports(json!({
            "ZebraSchema": { "type": "string" },
            "AppleSchema": { "type": "string" }
        }))).unwrap();
        let names: Vec<_> = d.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Apple", "Zebra"]);
    }

    #[test]
    fn references_inline_the_annotated_target() {
        let d = discover(&exports(json!({
            "JobSchema": { "type": "object", "children": { "title": { "type": "string" } } },
            "PersonSchema": {
                "type": "object",
                "children": {
                    "job": { "$ref": "JobSchema", "flags": { "presence": "required" }, "valids": [null] },
                    "previous": { "$ref": "Job" }
                }
            }
        }))).unwrap();

        let person = &d.schemas[1];
        let SchemaKind::Object { children } = &person.schema.kind else { panic!("expected object") };
        let job = &children[0].schema;
        assert!(matches!(job.kind, SchemaKind::Object { .. }));
        assert_eq!(job.presence, Presence::Required);
        assert!(job.is_nullable());
        assert!(job.notes.contains(&"type:Job".to_string()));
        assert_eq!(children[1].schema.presence, Presence::Optional);
    }

    #[test]
    fn unknown_reference_is_fatal() {
        let err = discover(&exports(json!({
            "PersonSchema": { "type": "object", "children": { "job": { "$ref": "JobSchema" } } }
        }))).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { ref target, .. } if target == "JobSchema"));
    }

    #[test]
    fn cyclic_reference_is_fatal() {
        let err = discover(&exports(json!({
            "NodeSchema": { "type": "object", "children": { "next": { "$ref": "NodeSchema" } } }
        }))).unwrap_err();
        match err {
            Error::CyclicReference { chain } => assert_eq!(chain, "NodeSchema → NodeSchema"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
