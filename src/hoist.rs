//! Hoisting: lift nested named types to the flat, top-level list.
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::ir::VisitedType;

/// Flatten `roots` plus every named type reachable through interface fields.
///
/// `registered` holds named types the derivation met where only a name is
/// kept (array elements, alternatives, the `Uuid` alias). Types named in
/// `imported` are declared elsewhere and are never added. Each round appends
/// the newly found names in sorted order; the loop ends when a round finds
/// nothing, which it must since every round grows a set of distinct names
/// drawn from a finite tree.
pub fn hoist(
    imported: &BTreeSet<String>,
    roots: Vec<VisitedType>,
    registered: Vec<VisitedType>,
) -> Vec<VisitedType> {
    let mut out: Vec<VisitedType> = Vec::with_capacity(roots.len() + registered.len());
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for ty in roots {
        if let Some(name) = ty.name() {
            if !seen.insert(name.to_string()) {
                continue;
            }
        }
        out.push(ty);
    }

    let extra: BTreeMap<String, VisitedType> = registered
        .into_iter()
        .filter_map(|ty| Some((ty.name()?.to_string(), ty)))
        .filter(|(name, _)| !seen.contains(name) && !imported.contains(name))
        .collect();
    for (name, ty) in extra {
        if seen.insert(name) {
            out.push(ty);
        }
    }

    let mut frontier = 0;
    let mut round = 0;
    loop {
        let mut found: BTreeMap<String, VisitedType> = BTreeMap::new();
        for ty in &out[frontier..] {
            for field in ty.fields() {
                let Some(name) = field.ty.name() else { continue };
                if seen.contains(name) || imported.contains(name) || found.contains_key(name) {
                    continue;
                }
                found.insert(name.to_string(), field.ty.clone());
            }
        }

        round += 1;
        debug!(round, added = found.len(), "hoisting round");
        if found.is_empty() {
            break;
        }

        frontier = out.len();
        for (name, ty) in found {
            seen.insert(name);
            out.push(ty);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BasicType, Field, TypeClass};

    fn named(name: &str, class: TypeClass) -> VisitedType {
        VisitedType::new(Some(name.into()), false, class)
    }

    fn iface(name: &str, fields: Vec<(&str, VisitedType)>) -> VisitedType {
        named(name, TypeClass::Interface {
            fields: fields
                .into_iter()
                .map(|(key, ty)| Field { key: key.into(), required: true, ty })
                .collect(),
        })
    }

    fn names(types: &[VisitedType]) -> Vec<&str> {
        types.iter().filter_map(|t| t.name()).collect()
    }

    #[test]
    fn nested_named_types_are_hoisted_once() {
        let inner = named("Inner", TypeClass::StringUnion { alternatives: vec!["cats".into(), "dogs".into()] });
        let outer = iface("Outer", vec![
            ("foo", VisitedType::new(None, false, TypeClass::basic(BasicType::Number))),
            ("inner", inner.clone()),
            ("inner2", inner),
        ]);
        let out = hoist(&BTreeSet::new(), vec![outer], vec![]);
        assert_eq!(names(&out), ["Outer", "Inner"]);
    }

    #[test]
    fn hoisting_is_transitive() {
        let street = named("Street", TypeClass::basic(BasicType::String));
        let address = iface("Address", vec![("street", street)]);
        let person = iface("Person", vec![("home", address.clone()), ("work", address)]);
        let out = hoist(&BTreeSet::new(), vec![person], vec![]);
        assert_eq!(names(&out), ["Person", "Address", "Street"]);
    }

    #[test]
    fn imported_names_are_skipped() {
        let uuid = named("Uuid", TypeClass::basic(BasicType::String));
        let money = named("Money", TypeClass::basic(BasicType::Number));
        let order = iface("Order", vec![("id", uuid.clone()), ("total", money)]);
        let imported = BTreeSet::from(["Uuid".to_string(), "Money".to_string()]);
        let out = hoist(&imported, vec![order], vec![uuid]);
        assert_eq!(names(&out), ["Order"]);
    }

    #[test]
    fn registered_types_join_in_name_order() {
        let person = iface("Person", vec![("id", named("Uuid", TypeClass::basic(BasicType::String)))]);
        let registered = vec![
            named("Uuid", TypeClass::basic(BasicType::String)),
            named("Shape", TypeClass::Unknown),
            named("Person", TypeClass::Unknown),
        ];
        let out = hoist(&BTreeSet::new(), vec![person.clone()], registered);
        assert_eq!(names(&out), ["Person", "Shape", "Uuid"]);
        assert_eq!(out[0], person);
    }

    #[test]
    fn round_order_is_independent_of_field_order() {
        let b = named("B", TypeClass::basic(BasicType::String));
        let a = named("A", TypeClass::basic(BasicType::String));
        let x = iface("X", vec![("b", b.clone()), ("a", a.clone())]);
        let y = iface("X", vec![("a", a), ("b", b)]);
        assert_eq!(
            names(&hoist(&BTreeSet::new(), vec![x], vec![])),
            names(&hoist(&BTreeSet::new(), vec![y], vec![]))
        );
    }
}
