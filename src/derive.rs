//! Schema → type derivation.
//!
//! A fixed, ordered list of matchers; the dispatcher commits to the first one
//! that recognises the node and falls back to [`TypeClass::Unknown`].
//!
//! Order matters:
//! - structural kinds (alternatives, array, object) before any string refinement;
//! - among strings, the identifier format before the literal enumeration, and
//!   the enumeration before the plain string fallback.
//!
//! The only state carried between calls is the [`Deriver`]'s accumulator of
//! nested named types, which is append-only and deduplicated by name.
pub mod scalar;
pub mod structural;

use tracing::warn;

use crate::discovery::NamedSchema;
use crate::error::Result;
use crate::ir::{TypeClass, VisitedType};
use crate::naming::name_from_notes;
use crate::schema::SchemaNode;

/// `(schema, recurse) -> type | no-match`
pub type Matcher = fn(&SchemaNode, &mut Deriver) -> Result<Option<VisitedType>>;

/// The dispatch chain, highest priority first.
pub const MATCHERS: [(&str, Matcher); 9] = [
    ("alternatives", structural::visit_alternatives),
    ("array", structural::visit_array),
    ("object", structural::visit_object),
    ("guid", scalar::visit_guid),
    ("string-enum", scalar::visit_string_enum),
    ("boolean", scalar::visit_boolean),
    ("date", scalar::visit_date),
    ("number", scalar::visit_number),
    ("string", scalar::visit_string),
];

/// Per-run derivation context.
#[derive(Debug, Default)]
pub struct Deriver {
    discovered: Vec<VisitedType>,
    path: Vec<String>,
}

/// Output of deriving a whole discovered set.
#[derive(Debug, Clone, Default)]
pub struct Derived {
    /// one per discovered schema, same order
    pub roots: Vec<VisitedType>,
    /// named types met inside element/alternative lists, plus well-known aliases
    pub registered: Vec<VisitedType>,
}

impl Deriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(&mut self, schema: &SchemaNode) -> Result<VisitedType> {
        for (_, matcher) in MATCHERS.iter() {
            if let Some(ty) = matcher(schema, self)? {
                return Ok(ty);
            }
        }
        Ok(self.unknown(schema))
    }

    pub fn derive_named(&mut self, named: &NamedSchema) -> Result<VisitedType> {
        self.path = vec![named.name.clone()];
        let ty = self.derive(&named.schema);
        self.path.clear();
        ty
    }

    pub fn discovered(&self) -> &[VisitedType] {
        &self.discovered
    }

    pub fn into_discovered(self) -> Vec<VisitedType> {
        self.discovered
    }

    /// Append a named type to the accumulator unless one with that name exists.
    pub(crate) fn register(&mut self, ty: &VisitedType) {
        let Some(name) = ty.name() else { return };
        if !self.discovered.iter().any(|t| t.name() == Some(name)) {
            self.discovered.push(ty.clone());
        }
    }

    /// Run `f` with `segment` (`.key` or `[i]`) appended to the error path.
    pub(crate) fn descend<T>(
        &mut self,
        segment: String,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let out = f(self);
        self.path.pop();
        out
    }

    pub(crate) fn path(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.concat()
        }
    }

    fn unknown(&self, schema: &SchemaNode) -> VisitedType {
        warn!(kind = schema.kind_tag(), path = %self.path(), "unrecognised schema kind, emitting unknown");
        VisitedType::new(name_from_notes(&schema.notes), schema.is_nullable(), TypeClass::Unknown)
    }
}

/// Derive every discovered schema with one shared accumulator.
pub fn derive_all(schemas: &[NamedSchema]) -> Result<Derived> {
    let mut deriver = Deriver::new();
    let roots = schemas
        .iter()
        .map(|named| deriver.derive_named(named))
        .collect::<Result<Vec<_>>>()?;
    Ok(Derived { roots, registered: deriver.into_discovered() })
}
