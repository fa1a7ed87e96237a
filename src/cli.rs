//! CLI: config + exported schemas → (artifacts | types | inspect)
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tempfile::NamedTempFile;
use tracing::info;

use joi_typegen::{Artifact, Config, VisitedType};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive TypeScript types, coercion utilities and optics from exported joi schemas
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render and write every configured artifact
    Generate(GenerateOut),
    /// render only the type declarations
    Types(TypesOut),
    /// print the ordered type list as JSON (debug view)
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct ConfigSettings {
    /// configuration file; a `joiTypegen` member is used when present
    #[arg(long, default_value = "package.json")]
    config: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    config_settings: ConfigSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    config_settings: ConfigSettings,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    #[command(flatten)]
    config_settings: ConfigSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ConfigSettings {
    fn load(&self) -> anyhow::Result<(Config, joi_typegen::Exports)> {
        let config = joi_typegen::config::load(&self.config)
            .with_context(|| format!("failed to load configuration from {}", self.config.display()))?;
        let input = &config.paths.input;
        let source = std::fs::read_to_string(input)
            .with_context(|| format!("failed to read schema exports from {}", input.display()))?;
        let exports = joi_typegen::discovery::read_exports(&source)
            .with_context(|| format!("failed to parse schema exports in {}", input.display()))?;
        Ok((config, exports))
    }

    fn derive(&self) -> anyhow::Result<(Config, Vec<VisitedType>)> {
        let (config, exports) = self.load()?;
        let discovery = joi_typegen::discovery::discover(&exports)?;
        let types = joi_typegen::derive_types(&discovery, &config)?;
        Ok((config, types))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                // 1) render everything in memory
                let (config, exports) = target.config_settings.load()?;
                let artifacts = joi_typegen::generate(&exports, &config)?;

                // 2) only then touch the filesystem
                let written = write_artifacts(artifacts.files())?;
                eprintln!(
                    "{} {written} file(s) from {}",
                    "generated".green().bold(),
                    config.paths.input.display()
                );
            }
            Command::Types(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let (config, types) = target.config_settings.derive()?;
                let src = joi_typegen::render::render_types(&config, &types).render();
                emit(target.out.as_deref(), &src)?;
            }
            Command::Inspect(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let (_, types) = target.config_settings.derive()?;
                let src = serde_json::to_string_pretty(&types).context("failed to serialize types")?;
                emit(target.out.as_deref(), &src)?;
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Stages every artifact next to its target before replacing any target.
fn write_artifacts<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> anyhow::Result<usize> {
    let mut staged = Vec::new();
    for artifact in artifacts {
        staged.push((stage(&artifact.path, &artifact.contents)?, artifact));
    }
    let count = staged.len();
    for (file, artifact) in staged {
        file.persist(&artifact.path)
            .with_context(|| format!("failed to write {}", artifact.path.display()))?;
        info!(path = %artifact.path.display(), bytes = artifact.contents.len(), "wrote artifact");
    }
    Ok(count)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    stage(path, contents)?
        .persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// temp file in the target's directory; dropped (and removed) unless persisted
fn stage(path: &Path, contents: &str) -> anyhow::Result<NamedTempFile> {
    if path.is_dir() {
        anyhow::bail!("cannot write {}: it is a directory", path.display());
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to stage {}", path.display()))?;
    Ok(file)
}

fn emit(out: Option<&Path>, src: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            write_file(path, src)?;
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
        None => println!("{src}"),
    }
    Ok(())
}
