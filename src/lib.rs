//! Derive TypeScript declarations, coercion helpers and optics from
//! serialized validation-schema descriptions.
//!
//! Pipeline: [`discovery`] → [`derive`] → [`hoist`] → [`order`] → [`render`].
//! Everything here is in-memory; the binary does the reading and writing.
use std::path::PathBuf;

use tracing::debug;

pub mod config;
pub mod derive;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod hoist;
pub mod ir;
pub mod naming;
pub mod order;
pub mod path_de;
pub mod render;
pub mod schema;

pub use config::{Config, NullableMode};
pub use discovery::{Discovery, Exports};
pub use error::{Error, Result};
pub use ir::{BasicType, Field, TypeClass, VisitedType};

/// A rendered output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub types: Artifact,
    pub utils: Artifact,
    pub library: Artifact,
    /// empty unless an optics directory is configured
    pub optics: Vec<Artifact>,
}

impl Artifacts {
    pub fn files(&self) -> impl Iterator<Item = &Artifact> {
        [&self.types, &self.utils, &self.library].into_iter().chain(self.optics.iter())
    }
}

/// Discovery output → flat, deduplicated, dependency-ordered type list.
pub fn derive_types(discovery: &Discovery, config: &Config) -> Result<Vec<VisitedType>> {
    let derived = derive::derive_all(&discovery.schemas)?;
    let hoisted = hoist::hoist(&config.imported_names(), derived.roots, derived.registered);
    Ok(order::order(hoisted))
}

/// Run the whole pipeline over an export map and render every artifact.
pub fn generate(exports: &Exports, config: &Config) -> Result<Artifacts> {
    let discovery = discovery::discover(exports)?;
    let types = derive_types(&discovery, config)?;
    debug!(types = types.len(), "rendering artifacts");

    let optics = match config.paths.optics {
        Some(_) => render::render_optics(config, &types)
            .into_iter()
            .map(|file| Artifact { path: file.path, contents: file.content.render() })
            .collect(),
        None => Vec::new(),
    };

    Ok(Artifacts {
        types: Artifact {
            path: config.paths.types.clone(),
            contents: render::render_types(config, &types).render(),
        },
        utils: Artifact {
            path: config.paths.utils.clone(),
            contents: render::render_coercion(config, &discovery, &types).render(),
        },
        library: Artifact {
            path: config.paths.library.clone(),
            contents: render::render_library(config).to_string(),
        },
        optics,
    })
}
