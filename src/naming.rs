//! Name annotations and the small string conventions shared by every stage.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::ir::{TypeClass, VisitedType};

static TYPE_NOTE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^type:").expect("valid note regex"));
static SCHEMA_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Schema$").expect("valid suffix regex"));
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));
static WORD_CHUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid word regex"));

/// Well-known alias every identifier-formatted string resolves to.
pub const UUID_ALIAS: &str = "Uuid";

/// First `type:<Name>` note, prefix stripped.
pub fn name_from_notes(notes: &[String]) -> Option<String> {
    notes
        .iter()
        .filter(|note| TYPE_NOTE_PREFIX.is_match(note))
        .map(|note| TYPE_NOTE_PREFIX.replace(note, "").into_owned())
        .find(|name| !name.is_empty())
}

pub fn name_note(name: &str) -> String {
    format!("type:{name}")
}

/// `PersonSchema` → `Some("Person")`; anything else → `None`.
pub fn canonical_name(export: &str) -> Option<&str> {
    let m = SCHEMA_SUFFIX.find(export)?;
    let stem = &export[..m.start()];
    (!stem.is_empty()).then_some(stem)
}

pub fn schema_export(name: &str) -> String {
    format!("{name}Schema")
}

pub fn factory_export(name: &str) -> String {
    format!("{name}Factory")
}

/// How `ty` is mentioned inside an element or alternative list.
///
/// Named types by name, unnamed leaves by primitive tag. Structural types
/// without a name cannot be mentioned at all.
pub fn type_reference(ty: &VisitedType, path: &str) -> Result<String> {
    if let Some(name) = ty.name() {
        return Ok(name.to_string());
    }
    match &ty.class {
        class if class.requires_name() => {
            Err(Error::MissingName { kind: class.label(), path: path.to_string() })
        }
        TypeClass::Basic { basic } => Ok(basic.as_str().to_string()),
        _ => Ok("unknown".to_string()),
    }
}

pub fn is_identifier(key: &str) -> bool {
    IDENTIFIER.is_match(key)
}

/// Object key as it may appear in a declaration: bare when possible, quoted otherwise.
pub fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// `foo-dashed` → `fooDashed`, `UserID` → `userId`, `numberOptions` stays.
pub fn camel_case(key: &str) -> String {
    let words = WORD_CHUNK
        .find_iter(key)
        .flat_map(|chunk| split_case_boundaries(chunk.as_str()))
        .collect::<Vec<_>>();

    let mut out = String::with_capacity(key.len());
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

// "numberOptions" → ["number", "Options"], "HTTPServer" → ["HTTP", "Server"]
fn split_case_boundaries(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if c.is_uppercase() => {
                p.is_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
            }
            _ => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
