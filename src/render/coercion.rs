use std::collections::BTreeSet;

use crate::config::Config;
use crate::discovery::Discovery;
use crate::emit::{Block, Document, module_path};
use crate::ir::VisitedType;
use crate::naming::{factory_export, schema_export};

/// The coercion-utilities artifact: one `<Name>Utils` bundle per type whose
/// schema is exported.
pub fn render_coercion(config: &Config, discovery: &Discovery, types: &[VisitedType]) -> Document {
    let coercible: BTreeSet<&str> = types
        .iter()
        .filter_map(VisitedType::name)
        .filter(|name| discovery.is_coercible(name))
        .collect();

    let utils = &config.paths.utils;
    let helpers = if coercible.iter().any(|name| discovery.has_factory(name)) {
        "coerceFactory, coerceValue"
    } else {
        "coerceValue"
    };

    let mut doc = Document::generated();
    doc.push(
        Block::new()
            .line(format!(
                "import {{ {helpers} }} from \"{}\";",
                module_path(utils, &config.paths.library)
            ))
            .line(format!("import * as s from \"{}\";", module_path(utils, &config.paths.schemas)))
            .line(format!("import * as t from \"{}\";", module_path(utils, &config.paths.types))),
    );
    for name in coercible {
        doc.push(bundle(name, discovery.has_factory(name)));
    }
    doc
}

fn bundle(name: &str, with_factory: bool) -> Block {
    let schema = schema_export(name);
    let mut block = Block::new().line(format!("export const {name}Utils = {{"));
    if with_factory {
        block.push(format!(
            "  build: coerceFactory<t.{name}>(s.{}, s.{schema}),",
            factory_export(name)
        ));
    }
    block.push(format!("  coerce: coerceValue<t.{name}>(s.{schema}),"));
    block.line("};")
}
