//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the `Mode` enum for conversion directions and the
//! `Args` struct containing all CLI arguments with validation logic.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Convert newline-delimited text into length-indicated frames
    Encode,
    /// Convert length-indicated frames back into newline-delimited text
    Decode,
}

/// Command-line arguments for the length-indicated converter.
///
/// Use the `validate()` method after parsing to ensure argument combinations
/// are valid.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use length_indicated::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "length-indicated")]
#[command(about = "Convert CSV text to length-indicated binary records and back")]
#[command(version)]
pub struct Args {
    /// Conversion mode: encode or decode
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Input file (text for encode, binary otherwise)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Output file for --mode
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Check a binary file for truncated frames
    #[arg(long, default_value = "false")]
    pub validate: bool,

    /// Print the records of a binary file to stdout
    #[arg(long, default_value = "false")]
    pub dump: bool,

    /// Maximum number of records printed by --dump
    #[arg(long)]
    pub limit: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// - exactly one of `--mode`, `--validate` or `--dump` is given
    /// - `--file` is always required
    /// - `--output` is required with `--mode` and rejected otherwise
    /// - `--limit` only applies to `--dump`
    /// - the input and output paths differ
    pub fn validate(&self) -> Result<(), String> {
        let selected = [self.mode.is_some(), self.validate, self.dump]
            .iter()
            .filter(|s| **s)
            .count();

        if selected == 0 {
            return Err("one of --mode, --validate or --dump is required".to_string());
        }

        if self.validate && self.mode.is_some() {
            return Err("--validate cannot be used with --mode".to_string());
        }

        if self.dump && self.mode.is_some() {
            return Err("--dump cannot be used with --mode".to_string());
        }

        if self.dump && self.validate {
            return Err("--dump cannot be used with --validate".to_string());
        }

        let file = match &self.file {
            Some(file) => file,
            None => {
                let flag = match self.mode {
                    Some(Mode::Encode) => "encode mode",
                    Some(Mode::Decode) => "decode mode",
                    None if self.validate => "--validate",
                    None => "--dump",
                };
                return Err(format!("--file is required for {}", flag));
            }
        };

        if self.limit.is_some() && !self.dump {
            return Err("--limit can only be used with --dump".to_string());
        }

        match (&self.mode, &self.output) {
            (Some(_), None) => return Err("--output is required with --mode".to_string()),
            (None, Some(_)) => {
                return Err("--output can only be used with --mode".to_string());
            }
            (Some(_), Some(output)) if same_file(file, output) => {
                return Err("--output must differ from --file".to_string());
            }
            _ => {}
        }

        Ok(())
    }

    /// Default log filter for the verbosity level. `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// True when both paths name the same file, however they are spelled.
///
/// An output that does not exist yet is resolved through its parent
/// directory. Paths that cannot be resolved are compared as written.
fn same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), resolve_output(output)) {
        (Ok(input), Some(output)) => input == output,
        _ => input == output,
    }
}

fn resolve_output(output: &Path) -> Option<PathBuf> {
    if let Ok(path) = output.canonicalize() {
        return Some(path);
    }
    let name = output.file_name()?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}
