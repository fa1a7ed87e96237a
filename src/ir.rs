// Strongly-typed type model produced by derivation. No schema nodes here.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitedType {
    /// `None` for inline leaves; set for anything that may be emitted at top level.
    pub name: Option<String>,
    /// the source schema explicitly allowed `null`
    pub nullable: bool,
    pub class: TypeClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeClass {
    Basic { basic: BasicType },
    Array { elements: Vec<String> },      // element type names, declaration order
    Interface { fields: Vec<Field> },     // declaration order
    StringUnion { alternatives: Vec<String> },
    Union { alternatives: Vec<String> },  // type names, sorted
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    Boolean,
    Number,
    String,
    Date,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub ty: VisitedType,
}

impl BasicType {
    /// Primitive tag; also what unnamed leaves are referenced by.
    pub fn as_str(self) -> &'static str {
        match self {
            BasicType::Boolean => "boolean",
            BasicType::Number => "number",
            BasicType::String => "string",
            BasicType::Date => "date",
            BasicType::Object => "object",
        }
    }
}

impl TypeClass {
    pub fn basic(basic: BasicType) -> Self {
        TypeClass::Basic { basic }
    }

    /// Human label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            TypeClass::Basic { .. } => "basic",
            TypeClass::Array { .. } => "array",
            TypeClass::Interface { .. } => "interface",
            TypeClass::StringUnion { .. } => "string-union",
            TypeClass::Union { .. } => "union",
            TypeClass::Unknown => "unknown",
        }
    }

    /// Types that can only be mentioned elsewhere through their name.
    pub fn requires_name(&self) -> bool {
        matches!(
            self,
            TypeClass::Array { .. }
                | TypeClass::Interface { .. }
                | TypeClass::StringUnion { .. }
                | TypeClass::Union { .. }
        )
    }
}

impl VisitedType {
    pub fn new(name: Option<String>, nullable: bool, class: TypeClass) -> Self {
        Self { name, nullable, class }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        match &self.class {
            TypeClass::Interface { fields } => fields,
            _ => &[],
        }
    }

    /// Names of the other types this one mentions.
    pub fn references(&self) -> Vec<&str> {
        match &self.class {
            TypeClass::Array { elements } => elements.iter().map(String::as_str).collect(),
            TypeClass::Union { alternatives } => alternatives.iter().map(String::as_str).collect(),
            TypeClass::Interface { fields } => fields
                .iter()
                .flat_map(|f| match f.ty.name() {
                    Some(name) => vec![name],
                    None => f.ty.references(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
