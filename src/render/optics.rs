use std::collections::BTreeSet;
use std::path::PathBuf;

use super::string_literal;
use super::types::{is_optional, type_expr};
use crate::config::{Config, NullableMode};
use crate::emit::{Block, Document, module_path};
use crate::ir::{Field, TypeClass, VisitedType};
use crate::naming::{camel_case, lower_first};

/// One generated accessor module.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticsFile {
    /// `<lowerFirst(Name)>Lenses.generated.ts`
    pub file_name: String,
    pub path: PathBuf,
    pub content: Document,
}

/// One accessor file per Interface type, in list order.
pub fn render_optics(config: &Config, types: &[VisitedType]) -> Vec<OpticsFile> {
    let dir = config.paths.optics.as_deref().unwrap_or(config.paths.project.as_path());
    let known: BTreeSet<&str> = types
        .iter()
        .filter_map(VisitedType::name)
        .chain(config.type_imports.keys().map(String::as_str))
        .collect();

    types
        .iter()
        .filter_map(|ty| match (&ty.class, ty.name()) {
            (TypeClass::Interface { fields }, Some(name)) => Some((name, fields)),
            _ => None,
        })
        .map(|(name, fields)| {
            let file_name = format!("{}Lenses.generated.ts", lower_first(name));
            let path = dir.join(&file_name);
            let types_module = module_path(&path, &config.paths.types);
            let content = interface_optics(config.nullable_mode, name, fields, &types_module, &known);
            OpticsFile { file_name, path, content }
        })
        .collect()
}

fn interface_optics(
    mode: NullableMode,
    name: &str,
    fields: &[Field],
    types_module: &str,
    known: &BTreeSet<&str>,
) -> Document {
    let has_optional = fields.iter().any(|f| is_optional(mode, f));
    // array targets in option mode mention Option too
    let needs_option = has_optional
        || fields.iter().any(|f| type_expr(mode, &f.ty).contains("Option<"));

    let mut imports = Block::new();
    if has_optional {
        imports.push(r#"import { Lens, Optional, Prism } from "monocle-ts";"#);
    } else {
        imports.push(r#"import { Lens } from "monocle-ts";"#);
    }
    if needs_option {
        imports.push(r#"import { Option } from "fp-ts/lib/Option";"#);
    }

    let mut mentioned: BTreeSet<&str> = BTreeSet::from([name]);
    for field in fields {
        match field.ty.name() {
            Some(n) => {
                mentioned.insert(n);
            }
            None => mentioned.extend(field.ty.references()),
        }
    }
    mentioned.retain(|n| known.contains(n));
    let type_list: Vec<&str> = mentioned.into_iter().collect();

    let mut doc = Document::generated();
    doc.push(imports);
    doc.push(Block::new().line(format!(
        "import {{ {} }} from {};",
        type_list.join(", "),
        string_literal(types_module)
    )));

    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    let stems = lens_stems(mode, &sorted);
    for (field, lens) in sorted.into_iter().zip(&stems) {
        for block in accessors(mode, name, field, lens) {
            doc.push(block);
        }
    }
    doc
}

/// Accessor name stems in key order. A stem whose exported names are
/// already taken gets the first free numeric suffix (`fooBar2`, `fooBar3`).
fn lens_stems(mode: NullableMode, sorted: &[&Field]) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    sorted
        .iter()
        .map(|field| {
            let base = match camel_case(&field.key) {
                s if s.is_empty() => "field".to_string(),
                s => s,
            };
            let exports = |stem: &str| -> Vec<String> {
                let mut names = vec![format!("{stem}Lens")];
                if is_optional(mode, field) {
                    names.push(format!("{stem}OptionalLens"));
                }
                names
            };
            let stem = std::iter::once(base.clone())
                .chain((2..).map(|n| format!("{base}{n}")))
                .find(|stem| exports(stem).iter().all(|n| !taken.contains(n)))
                .unwrap_or_else(|| base.clone());
            taken.extend(exports(&stem));
            stem
        })
        .collect()
}

// required: one direct lens; optional: an Option-valued lens plus a prism-composed optional
fn accessors(mode: NullableMode, from: &str, field: &Field, lens: &str) -> Vec<Block> {
    let to = type_expr(mode, &field.ty);
    let prop = string_literal(&field.key);
    let from_prop = format!("  .fromProp<{from}, {prop}>({prop});");

    if !is_optional(mode, field) {
        return vec![
            Block::new()
                .line(format!("export const {lens}Lens: Lens<{from}, {to}> = Lens"))
                .line(from_prop),
        ];
    }
    vec![
        Block::new()
            .line(format!("export const {lens}OptionalLens: Lens<{from}, Option<{to}>> = Lens"))
            .line(from_prop),
        Block::new()
            .line(format!("export const {lens}Lens: Optional<{from}, {to}> = {lens}OptionalLens"))
            .line(format!("  .composePrism(Prism.some<{to}>());")),
    ]
}
