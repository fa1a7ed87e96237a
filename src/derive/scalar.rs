use std::collections::BTreeSet;

use super::Deriver;
use crate::error::Result;
use crate::ir::{BasicType, TypeClass, VisitedType};
use crate::naming::{name_from_notes, UUID_ALIAS};
use crate::schema::{SchemaKind, SchemaNode};

const IDENTIFIER_TESTS: [&str; 2] = ["guid", "uuid"];

/// Identifier-formatted string → the shared `Uuid` alias, whatever the local name.
pub fn visit_guid(schema: &SchemaNode, d: &mut Deriver) -> Result<Option<VisitedType>> {
    if schema.kind != SchemaKind::String || !IDENTIFIER_TESTS.iter().any(|t| schema.has_test(t)) {
        return Ok(None);
    }
    let alias = VisitedType::new(Some(UUID_ALIAS.to_string()), false, TypeClass::basic(BasicType::String));
    d.register(&alias);
    Ok(Some(VisitedType { nullable: schema.is_nullable(), ..alias }))
}

/// String restricted to a non-empty literal set → StringUnion (sorted).
pub fn visit_string_enum(schema: &SchemaNode, _: &mut Deriver) -> Result<Option<VisitedType>> {
    if schema.kind != SchemaKind::String || !schema.allow_only {
        return Ok(None);
    }
    let literals: BTreeSet<&str> = schema
        .valids
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    if literals.is_empty() {
        return Ok(None);
    }
    Ok(Some(VisitedType::new(
        name_from_notes(&schema.notes),
        schema.is_nullable(),
        TypeClass::StringUnion { alternatives: literals.into_iter().map(String::from).collect() },
    )))
}

pub fn visit_boolean(schema: &SchemaNode, _: &mut Deriver) -> Result<Option<VisitedType>> {
    Ok(basic_if(schema, SchemaKind::Boolean, BasicType::Boolean))
}

pub fn visit_date(schema: &SchemaNode, _: &mut Deriver) -> Result<Option<VisitedType>> {
    Ok(basic_if(schema, SchemaKind::Date, BasicType::Date))
}

pub fn visit_number(schema: &SchemaNode, _: &mut Deriver) -> Result<Option<VisitedType>> {
    Ok(basic_if(schema, SchemaKind::Number, BasicType::Number))
}

pub fn visit_string(schema: &SchemaNode, _: &mut Deriver) -> Result<Option<VisitedType>> {
    Ok(basic_if(schema, SchemaKind::String, BasicType::String))
}

fn basic_if(schema: &SchemaNode, kind: SchemaKind, basic: BasicType) -> Option<VisitedType> {
    (schema.kind == kind).then(|| {
        VisitedType::new(name_from_notes(&schema.notes), schema.is_nullable(), TypeClass::basic(basic))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::tests::node;
    use serde_json::json;

    #[test]
    fn guid_registers_the_alias_once() {
        let mut d = Deriver::new();
        let a = visit_guid(&node(json!({ "type": "string", "rules": [{ "name": "guid" }], "notes": ["type:PersonId"] })), &mut d)
            .unwrap()
            .unwrap();
        let b = visit_guid(&node(json!({ "type": "string", "rules": ["guid"], "valids": [null] })), &mut d)
            .unwrap()
            .unwrap();

        assert_eq!(a.name(), Some("Uuid"));
        assert!(!a.nullable);
        assert!(b.nullable);
        assert_eq!(d.discovered().len(), 1);
        assert!(!d.discovered()[0].nullable);
    }

    #[test]
    fn enum_sorts_and_drops_null_and_blank() {
        let schema = node(json!({
            "type": "string",
            "flags": { "allowOnly": true },
            "valids": ["orange", null, "", "apple", "orange"],
            "notes": ["type:Fruit"]
        }));
        let ty = visit_string_enum(&schema, &mut Deriver::new()).unwrap().unwrap();
        assert_eq!(ty.class, TypeClass::StringUnion { alternatives: vec!["apple".into(), "orange".into()] });
        assert!(ty.nullable);
    }

    #[test]
    fn enum_needs_the_restrict_flag() {
        let schema = node(json!({ "type": "string", "valids": ["apple", "orange"] }));
        assert!(visit_string_enum(&schema, &mut Deriver::new()).unwrap().is_none());
    }

    #[test]
    fn blank_only_valids_are_a_plain_string() {
        let schema = node(json!({ "type": "string", "flags": { "allowOnly": true }, "valids": [""] }));
        assert!(visit_string_enum(&schema, &mut Deriver::new()).unwrap().is_none());
        let ty = Deriver::new().derive(&schema).unwrap();
        assert_eq!(ty.class, TypeClass::basic(BasicType::String));
    }

    #[test]
    fn leaves_take_names_only_from_notes() {
        let mut d = Deriver::new();
        let named = visit_number(&node(json!({ "type": "number", "notes": ["type:Age"] })), &mut d).unwrap().unwrap();
        let plain = visit_date(&node(json!({ "type": "date" })), &mut d).unwrap().unwrap();
        assert_eq!(named.name(), Some("Age"));
        assert_eq!(plain.name(), None);
        assert_eq!(plain.class, TypeClass::basic(BasicType::Date));
        assert!(visit_boolean(&node(json!({ "type": "string" })), &mut d).unwrap().is_none());
    }
}
