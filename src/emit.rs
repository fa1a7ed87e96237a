//! Structured output: documents are blocks of lines, serialized once.
//!
//! Renderers build [`Document`]s instead of concatenating strings, so their
//! tests can look at blocks and lines without caring about blank-line layout.
use std::path::{Component, Path, PathBuf};

/// Generated-file banner shared by every artifact.
pub const GENERATED_BANNER: &str =
    "// This file is generated by joi-typegen. Any changes made to it will be lost.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Document {
    /// A document that opens with the generated-file banner.
    pub fn generated() -> Self {
        let mut doc = Self::default();
        doc.push(Block::new().line("// tslint:disable").line(GENERATED_BANNER));
        doc
    }

    /// Empty blocks are dropped.
    pub fn push(&mut self, block: Block) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks separated by one blank line, every block newline-terminated.
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|b| {
                let mut s = b.lines.join("\n");
                s.push('\n');
                s
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Import specifier for `to_file` as seen from `from_file`:
/// `/` separated, script extension stripped, always starting with `.`.
pub fn module_path(from_file: &Path, to_file: &Path) -> String {
    let from_dir = normalize(from_file.parent().unwrap_or(Path::new("")));
    let to = normalize(to_file);

    let from_parts: Vec<_> = from_dir.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    segments.extend(to_parts[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    if let Some(last) = segments.last_mut() {
        for ext in [".ts", ".js"] {
            if let Some(stem) = last.strip_suffix(ext) {
                *last = stem.to_string();
                break;
            }
        }
    }

    let joined = segments.join("/");
    if joined.starts_with('.') { joined } else { format!("./{joined}") }
}

// lexical only; never touches the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
