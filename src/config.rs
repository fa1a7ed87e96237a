//! Generator configuration.
//!
//! Read from a JSON file: either a dedicated file, or a `package.json`-style
//! host whose `joiTypegen` member holds the settings. Relative paths resolve
//! against the directory of the file they were read from.
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Member holding the settings when they live inside a host file.
pub const SECTION: &str = "joiTypegen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NullableMode {
    /// optional fields get a `?` marker
    Nullable,
    /// optional fields are wrapped in `Option<T>`
    Option,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub nullable_mode: NullableMode,
    /// type name → module specifier it is imported from
    pub type_imports: BTreeMap<String, String>,
    pub paths: Paths,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub project: PathBuf,
    /// JSON dump of the schema module's exports
    pub input: PathBuf,
    /// schema module as the generated code imports it
    pub schemas: PathBuf,
    pub types: PathBuf,
    pub utils: PathBuf,
    pub library: PathBuf,
    /// directory receiving one optics file per interface
    pub optics: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    input: String,
    schemas: Option<String>,
    nullable_mode: NullableMode,
    #[serde(default)]
    type_imports: BTreeMap<String, String>,
    outputs: RawOutputs,
}

#[derive(Debug, Deserialize)]
struct RawOutputs {
    types: String,
    utils: String,
    library: String,
    optics: Option<String>,
}

impl Config {
    pub fn imported_names(&self) -> BTreeSet<String> {
        self.type_imports.keys().cloned().collect()
    }
}

/// Read and resolve the configuration file at `path`.
pub fn load(path: &Path) -> Result<Config> {
    let src = std::fs::read_to_string(path)?;
    let project = path.parent().unwrap_or(Path::new(""));
    from_str(&src, project)
}

pub fn from_str(src: &str, project: &Path) -> Result<Config> {
    let doc: Value = serde_json::from_str(src).map_err(|e| Error::Config(e.to_string()))?;
    let doc = match doc {
        Value::Object(mut map) if map.contains_key(SECTION) => map.remove(SECTION).unwrap_or_default(),
        other => other,
    };
    let raw: RawConfig = crate::path_de::from_value_with_path(doc)
        .map_err(|e| Error::Config(e.to_string()))?;

    let resolve = |member: &str, value: &str| -> Result<PathBuf> {
        if value.trim().is_empty() {
            return Err(Error::Config(format!("`{member}` must not be empty")));
        }
        Ok(project.join(value))
    };

    let input = resolve("input", &raw.input)?;
    let schemas = match raw.schemas.as_deref() {
        Some(s) => resolve("schemas", s)?,
        None => input.with_extension(""),
    };
    let optics = match raw.outputs.optics.as_deref() {
        None | Some("") => None,
        Some(dir) => Some(project.join(dir)),
    };

    Ok(Config {
        nullable_mode: raw.nullable_mode,
        type_imports: raw.type_imports,
        paths: Paths {
            project: project.to_path_buf(),
            input,
            schemas,
            types: resolve("outputs.types", &raw.outputs.types)?,
            utils: resolve("outputs.utils", &raw.outputs.utils)?,
            library: resolve("outputs.library", &raw.outputs.library)?,
            optics,
        },
    })
}
