//! Ordering: leaves first, structures after the things they mention.
use std::collections::HashMap;

use tracing::debug;

use crate::ir::{TypeClass, VisitedType};

/// Basic (0) < StringUnion/Union (1) < Array (2) < Interface (3).
pub fn priority(class: &TypeClass) -> u32 {
    match class {
        TypeClass::Basic { .. } => 0,
        TypeClass::StringUnion { .. } | TypeClass::Union { .. } => 1,
        TypeClass::Array { .. } => 2,
        TypeClass::Interface { .. } | TypeClass::Unknown => 3,
    }
}

/// Stable sort by rank, ties keep their position.
///
/// A type's rank is its [`priority`], raised to one past the rank of any
/// listed type it references. Without structural cross-references this is
/// exactly the priority order; with them, a referenced type never lands after
/// its referrer.
pub fn order(types: Vec<VisitedType>) -> Vec<VisitedType> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, ty) in types.iter().enumerate() {
        if let Some(name) = ty.name() {
            index.entry(name).or_insert(i);
        }
    }

    let mut ranks: Vec<Option<u32>> = vec![None; types.len()];
    let mut visiting = vec![false; types.len()];
    for i in 0..types.len() {
        rank_of(i, &types, &index, &mut ranks, &mut visiting);
    }
    let ranks: Vec<u32> = ranks.into_iter().map(Option::unwrap_or_default).collect();
    debug!(types = types.len(), max_rank = ranks.iter().max().copied().unwrap_or(0), "ordering types");

    let mut ranked: Vec<(u32, VisitedType)> = ranks.into_iter().zip(types).collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, ty)| ty).collect()
}

fn rank_of(
    i: usize,
    types: &[VisitedType],
    index: &HashMap<&str, usize>,
    ranks: &mut [Option<u32>],
    visiting: &mut [bool],
) -> u32 {
    if let Some(rank) = ranks[i] {
        return rank;
    }
    let own = priority(&types[i].class);
    // only reachable through a cycle, which discovery rejects
    if visiting[i] {
        return own;
    }
    visiting[i] = true;
    let mut rank = own;
    for name in types[i].references() {
        let Some(&j) = index.get(name) else { continue };
        if j == i {
            continue;
        }
        rank = rank.max(rank_of(j, types, index, ranks, visiting) + 1);
    }
    visiting[i] = false;
    ranks[i] = Some(rank);
    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BasicType, Field};

    fn named(name: &str, class: TypeClass) -> VisitedType {
        VisitedType::new(Some(name.into()), false, class)
    }

    fn field(key: &str, ty: VisitedType) -> Field {
        Field { key: key.into(), required: true, ty }
    }

    fn names(types: &[VisitedType]) -> Vec<&str> {
        types.iter().filter_map(|t| t.name()).collect()
    }

    #[test]
    fn sorts_by_priority_stably() {
        let types = vec![
            named("I1", TypeClass::Interface { fields: vec![field("a", VisitedType::new(None, false, TypeClass::basic(BasicType::String)))] }),
            named("A1", TypeClass::Array { elements: vec!["number".into()] }),
            named("S1", TypeClass::StringUnion { alternatives: vec!["x".into()] }),
            named("B1", TypeClass::basic(BasicType::String)),
            named("U1", TypeClass::Union { alternatives: vec!["number".into(), "string".into()] }),
            named("B2", TypeClass::basic(BasicType::Number)),
        ];
        assert_eq!(names(&order(types)), ["B1", "B2", "S1", "U1", "A1", "I1"]);
    }

    #[test]
    fn referenced_interfaces_come_first() {
        let job = named("Job", TypeClass::Interface { fields: vec![field("title", VisitedType::new(None, false, TypeClass::basic(BasicType::String)))] });
        let person = named("Person", TypeClass::Interface { fields: vec![field("job", job.clone())] });
        let team = named("Team", TypeClass::Array { elements: vec!["Person".into()] });
        let ordered = order(vec![team, person, job]);
        assert_eq!(names(&ordered), ["Job", "Person", "Team"]);
    }

    #[test]
    fn inline_arrays_count_as_references() {
        let shape = named("Shape", TypeClass::Interface { fields: vec![field("sides", VisitedType::new(None, false, TypeClass::basic(BasicType::Number)))] });
        let canvas = named("Canvas", TypeClass::Interface {
            fields: vec![field("shapes", VisitedType::new(None, false, TypeClass::Array { elements: vec!["Shape".into()] }))],
        });
        assert_eq!(names(&order(vec![canvas, shape])), ["Shape", "Canvas"]);
    }

    #[test]
    fn unknown_sorts_with_interfaces() {
        let ordered = order(vec![
            named("Blob", TypeClass::Unknown),
            named("Id", TypeClass::basic(BasicType::String)),
        ]);
        assert_eq!(names(&ordered), ["Id", "Blob"]);
    }
}
