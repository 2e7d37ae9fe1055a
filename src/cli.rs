//! Command-line configuration and the compile-and-write driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arlang::ArlangError;
use clap::Parser;
use thiserror::Error;
use tracing::debug;

/// Compile an ArLang program to a JVM class file.
#[derive(Debug, Clone, Parser)]
#[command(name = "arlang", version, about)]
pub struct Config {
    /// Source file, or the program text itself when no such file exists
    #[arg(allow_hyphen_values = true)]
    pub input: String,

    /// Name of the generated class
    #[arg(long, value_name = "NAME", default_value = "Program", value_parser = parse_class_name)]
    pub class_name: String,

    /// Directory the class file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Reject names the JVM cannot use as a top-level class name.
fn parse_class_name(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("class name must not be empty".into());
    }
    if let Some(ch) = name.chars().find(|ch| matches!(ch, '.' | ';' | '[' | '/')) {
        return Err(format!("class name must not contain '{ch}'"));
    }
    Ok(name.to_owned())
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Compile(#[from] ArlangError),
}

impl CliError {
    /// The message printed to stderr, with a source excerpt for compile
    /// errors that carry a location.
    pub fn render(&self, source: &str) -> String {
        match self {
            CliError::Compile(err) => err.display_with_source(source),
            other => format!("error: {other}\n"),
        }
    }
}

/// Where the program text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf, String),
    Inline(String),
}

impl Source {
    pub fn text(&self) -> &str {
        match self {
            Source::File(_, text) | Source::Inline(text) => text,
        }
    }
}

/// Read `input` as a file if one exists at that path, otherwise treat it as
/// the program text.
pub fn load_source(input: &str) -> Result<Source, CliError> {
    let path = Path::new(input);
    if !path.is_file() {
        return Ok(Source::Inline(input.to_owned()));
    }
    fs::read_to_string(path)
        .map(|text| Source::File(path.to_path_buf(), text))
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Compile `source` and write `<ClassName>.class` into the output directory.
///
/// Nothing is written when compilation fails.
pub fn run(config: &Config, source: &str) -> Result<PathBuf, CliError> {
    let module = arlang::compile(source, &config.class_name)?;

    let path = config.out_dir.join(module.file_name());
    let write_error = |err| CliError::Write {
        path: path.clone(),
        source: err,
    };
    debug!(
        bytes = module.as_bytes().len(),
        max_stack = module.max_stack(),
        max_locals = module.max_locals(),
        "writing class file"
    );
    fs::create_dir_all(&config.out_dir).map_err(write_error)?;
    fs::write(&path, module.into_bytes()).map_err(write_error)?;
    Ok(path)
}
