use std::collections::BTreeSet;

use super::Deriver;
use crate::error::{Error, Result};
use crate::ir::{BasicType, Field, TypeClass, VisitedType};
use crate::naming::{name_from_notes, type_reference};
use crate::schema::{SchemaKind, SchemaNode};

/// Alternatives → Union of the matches' names, deduplicated and sorted.
pub fn visit_alternatives(schema: &SchemaNode, d: &mut Deriver) -> Result<Option<VisitedType>> {
    let SchemaKind::Alternatives { matches } = &schema.kind else { return Ok(None) };
    if matches.is_empty() {
        return Ok(None);
    }

    let mut alternatives = BTreeSet::new();
    for (i, alt) in matches.iter().enumerate() {
        let name = d.descend(format!("[{i}]"), |d| {
            let ty = d.derive(alt)?;
            let name = type_reference(&ty, &d.path())?;
            d.register(&ty);
            Ok(name)
        })?;
        alternatives.insert(name);
    }

    Ok(Some(VisitedType::new(
        name_from_notes(&schema.notes),
        schema.is_nullable(),
        TypeClass::Union { alternatives: alternatives.into_iter().collect() },
    )))
}

/// Array → element names in declaration order; nullable items add `null`.
pub fn visit_array(schema: &SchemaNode, d: &mut Deriver) -> Result<Option<VisitedType>> {
    let SchemaKind::Array { items } = &schema.kind else { return Ok(None) };

    let mut elements: Vec<String> = Vec::with_capacity(items.len());
    let mut push = |name: String| {
        if !elements.contains(&name) {
            elements.push(name);
        }
    };
    for (i, item) in items.iter().enumerate() {
        let (name, nullable) = d.descend(format!("[{i}]"), |d| {
            let ty = d.derive(item)?;
            let name = type_reference(&ty, &d.path())?;
            d.register(&ty);
            Ok((name, ty.nullable))
        })?;
        push(name);
        if nullable {
            push("null".to_string());
        }
    }

    Ok(Some(VisitedType::new(
        name_from_notes(&schema.notes),
        schema.is_nullable(),
        TypeClass::Array { elements },
    )))
}

/// Object → Interface over its children, or `Basic(object)` when it has none.
pub fn visit_object(schema: &SchemaNode, d: &mut Deriver) -> Result<Option<VisitedType>> {
    let SchemaKind::Object { children } = &schema.kind else { return Ok(None) };
    let name = name_from_notes(&schema.notes);
    let nullable = schema.is_nullable();

    if children.is_empty() {
        return Ok(Some(VisitedType::new(name, nullable, TypeClass::basic(BasicType::Object))));
    }

    let fields = children
        .iter()
        .map(|child| {
            d.descend(format!(".{}", child.key), |d| {
                let ty = d.derive(&child.schema)?;
                // interfaces are only ever mentioned by name
                if matches!(ty.class, TypeClass::Interface { .. }) && ty.name.is_none() {
                    return Err(Error::MissingName { kind: ty.class.label(), path: d.path() });
                }
                Ok(Field { key: child.key.clone(), required: child.schema.is_required(), ty })
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(VisitedType::new(name, nullable, TypeClass::Interface { fields })))
}
