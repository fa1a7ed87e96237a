use std::collections::BTreeMap;

use super::string_literal;
use crate::config::{Config, NullableMode};
use crate::emit::{Block, Document};
use crate::ir::{BasicType, Field, TypeClass, VisitedType};
use crate::naming::property_key;

/// The type-declarations artifact.
pub fn render_types(config: &Config, types: &[VisitedType]) -> Document {
    let mut doc = Document::generated();
    let mode = config.nullable_mode;

    let mut imports = Block::new();
    if mode == NullableMode::Option {
        imports.push(r#"import { Option } from "fp-ts/lib/Option";"#);
    }
    let mut by_source: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, source) in &config.type_imports {
        by_source.entry(source.as_str()).or_default().push(name.as_str());
    }
    for (source, names) in &by_source {
        imports.push(format!("import {{ {} }} from {};", names.join(", "), string_literal(source)));
    }
    doc.push(imports);

    if !config.type_imports.is_empty() {
        let names: Vec<&str> = config.type_imports.keys().map(String::as_str).collect();
        doc.push(Block::new().line(format!("export {{ {} }};", names.join(", "))));
    }

    for ty in types {
        if let Some(block) = declaration(mode, ty) {
            doc.push(block);
        }
    }
    doc
}

/// One top-level declaration; unnamed types cannot be declared.
pub fn declaration(mode: NullableMode, ty: &VisitedType) -> Option<Block> {
    let name = ty.name()?;
    let block = match &ty.class {
        TypeClass::Basic { basic } => {
            Block::new().line(format!("export type {name} = {};", basic_expr(*basic)))
        }
        TypeClass::StringUnion { alternatives } => {
            alternation(name, alternatives.iter().map(|a| string_literal(a)))
        }
        TypeClass::Union { alternatives } => {
            alternation(name, alternatives.iter().map(|a| reference_expr(a).to_string()))
        }
        TypeClass::Array { elements } => {
            Block::new().line(format!("export type {name} = {};", array_expr(mode, elements)))
        }
        TypeClass::Interface { fields } => {
            let mut block = Block::new().line(format!("export interface {name} {{"));
            for field in fields {
                block.push(format!("  {};", field_decl(mode, field)));
            }
            block.line("}")
        }
        TypeClass::Unknown => Block::new().line(format!("// Unknown type: {name}")),
    };
    Some(block)
}

/// Whether a field's value may be absent in the generated type.
///
/// Presence and nullability are independent: `nullable` mode only marks
/// optional fields, `option` mode also wraps fields that allow `null`.
pub fn is_optional(mode: NullableMode, field: &Field) -> bool {
    match mode {
        NullableMode::Nullable => !field.required,
        NullableMode::Option => !field.required || field.ty.nullable,
    }
}

/// `key: T`, `key?: T` or `key: Option<T>`.
pub fn field_decl(mode: NullableMode, field: &Field) -> String {
    let key = property_key(&field.key);
    let ty = type_expr(mode, &field.ty);
    match (mode, is_optional(mode, field)) {
        (_, false) => format!("{key}: {ty}"),
        (NullableMode::Nullable, true) => format!("{key}?: {ty}"),
        (NullableMode::Option, true) => format!("{key}: Option<{ty}>"),
    }
}

/// How a field (or accessor) mentions `ty`.
pub fn type_expr(mode: NullableMode, ty: &VisitedType) -> String {
    if let Some(name) = ty.name() {
        return name.to_string();
    }
    match &ty.class {
        TypeClass::Basic { basic } => basic_expr(*basic).to_string(),
        TypeClass::Array { elements } => array_expr(mode, elements),
        TypeClass::StringUnion { alternatives } => {
            alternatives.iter().map(|a| string_literal(a)).collect::<Vec<_>>().join(" | ")
        }
        TypeClass::Union { alternatives } => {
            alternatives.iter().map(|a| reference_expr(a)).collect::<Vec<_>>().join(" | ")
        }
        TypeClass::Interface { .. } => "object".to_string(),
        TypeClass::Unknown => "unknown".to_string(),
    }
}

/// `T[]` for one element shape, `Array<A | B>` otherwise; in option mode a
/// `null` element turns the rest into `Option<…>`.
pub fn array_expr(mode: NullableMode, elements: &[String]) -> String {
    if elements.is_empty() {
        return "unknown[]".to_string();
    }
    let has_null = elements.iter().any(|e| e == "null");
    if mode == NullableMode::Option && has_null {
        let rest: Vec<&str> = elements
            .iter()
            .filter(|e| *e != "null")
            .map(|e| reference_expr(e))
            .collect();
        return format!("Array<Option<{}>>", rest.join(" | "));
    }
    if let [single] = elements {
        return format!("{}[]", reference_expr(single));
    }
    let all: Vec<&str> = elements.iter().map(|e| reference_expr(e)).collect();
    format!("Array<{}>", all.join(" | "))
}

fn alternation(name: &str, alternatives: impl Iterator<Item = String>) -> Block {
    let mut block = Block::new().line(format!("export type {name} ="));
    let mut lines: Vec<String> = alternatives.map(|a| format!("  | {a}")).collect();
    if let Some(last) = lines.last_mut() {
        last.push(';');
    }
    for line in lines {
        block.push(line);
    }
    block
}

fn basic_expr(basic: BasicType) -> &'static str {
    match basic {
        BasicType::Date => "Date",
        other => other.as_str(),
    }
}

// element and alternative lists hold primitive tags for unnamed leaves
fn reference_expr(name: &str) -> &str {
    match name {
        "date" => "Date",
        other => other,
    }
}
