//! Crate-wide error type.
//!
//! Every failure aborts the generation run; nothing here is recovered locally.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A structural type is referenced by name but carries no `type:` note.
    #[error("{kind} type at `{path}` has no name annotation (add a `type:<Name>` note)")]
    MissingName { kind: &'static str, path: String },

    /// A schema description could not be read into the input model.
    #[error("invalid schema description for export `{export}`: {message}")]
    InvalidSchema { export: String, message: String },

    #[error("export `{export}` references unknown export `{target}`")]
    UnresolvedReference { export: String, target: String },

    #[error("cyclic schema reference: {chain}")]
    CyclicReference { chain: String },

    #[error("configuration error: {0}")]
    Config(String),

    /// Deserialization failure with the JSON path of the offending node.
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
