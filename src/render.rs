//! Renderers: ordered type list → TypeScript artifacts.
//!
//! Each renderer is a pure function returning [`Document`](crate::emit::Document)s;
//! writing them anywhere is the caller's business.
pub mod coercion;
pub mod library;
pub mod optics;
pub mod types;

pub use coercion::render_coercion;
pub use library::render_library;
pub use optics::{OpticsFile, render_optics};
pub use types::render_types;

/// Quote a string literal the way the generated code expects it.
pub(crate) fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
