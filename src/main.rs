//! length-indicated - Convert CSV text to length-prefixed binary records
//!
//! This CLI tool provides four operations:
//! - **Encode**: write every line of a text file as a length-prefixed frame
//! - **Decode**: write every frame of a binary file back as a text line
//! - **Validate**: check a binary file for a truncated final frame
//! - **Dump**: print the records of a binary file with their offsets
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O error or validation failure |
//! | 4 | Data error (binary file ends inside a frame) |

use clap::Parser;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use length_indicated::cli::{Args, Mode};
use length_indicated::{
    convert_from_length_indicated, convert_to_length_indicated, FrameReader, FrameValidator,
    LengthIndicatedError,
};

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for validation failure (same as IO error)
const EXIT_VALIDATION_FAILURE: u8 = 3;
/// Exit code for damaged binary input
const EXIT_DATA_ERROR: u8 = 4;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), LengthIndicatedError> {
    if args.validate {
        return run_validate_mode(args);
    }

    if args.dump {
        return run_dump_mode(args);
    }

    match args.mode {
        Some(mode) => run_convert_mode(args, mode),
        None => Err(LengthIndicatedError::InvalidArgument(
            "--mode is required".to_string(),
        )),
    }
}

/// Run an encode or decode conversion and print its report.
fn run_convert_mode(args: &Args, mode: Mode) -> Result<(), LengthIndicatedError> {
    let (input, output) = input_output(args)?;

    eprintln!("Input file: {:?}", input);
    eprintln!("Output file: {:?}", output);

    match mode {
        Mode::Encode => {
            let stats = convert_to_length_indicated(input, output)?;
            println!("{}", stats);
        }
        Mode::Decode => {
            let stats = convert_from_length_indicated(input, output)?;
            println!("{}", stats);
        }
    }

    Ok(())
}

/// Validate a binary file and print the report.
fn run_validate_mode(args: &Args) -> Result<(), LengthIndicatedError> {
    let file_path = input_file(args)?;
    eprintln!("Validating file: {:?}", file_path);

    let stats = FrameValidator::new().validate(file_path)?;
    println!("{}", stats);

    match stats.truncated {
        None => {
            eprintln!(
                "Validation complete. All {} frames are intact.",
                stats.total_frames
            );
            Ok(())
        }
        Some(cut) => Err(LengthIndicatedError::ValidationFailed(format!(
            "file ends inside the frame at offset {}",
            cut.offset
        ))),
    }
}

/// Print the records of a binary file to stdout.
fn run_dump_mode(args: &Args) -> Result<(), LengthIndicatedError> {
    let file_path = input_file(args)?;
    let reader = FrameReader::open(file_path)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    dump_records(reader, args.limit, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write records as `index<TAB>offset<TAB>payload`, payload decoded lossily.
///
/// Stops after `limit` records when given. Returns the number written.
fn dump_records<R: Read, W: Write>(
    mut reader: FrameReader<R>,
    limit: Option<u64>,
    out: &mut W,
) -> Result<u64, LengthIndicatedError> {
    while limit.map_or(true, |limit| reader.records_read() < limit) {
        let offset = reader.offset();
        let index = reader.records_read();
        let Some(record) = reader.read_next()? else {
            break;
        };
        writeln!(out, "{}\t{}\t{}", index, offset, record.to_text_lossy())?;
    }
    Ok(reader.records_read())
}

fn input_file(args: &Args) -> Result<&std::path::Path, LengthIndicatedError> {
    args.file
        .as_deref()
        .ok_or_else(|| LengthIndicatedError::InvalidArgument("--file is required".to_string()))
}

fn input_output(args: &Args) -> Result<(&std::path::Path, &std::path::Path), LengthIndicatedError> {
    let output = args
        .output
        .as_deref()
        .ok_or_else(|| LengthIndicatedError::InvalidArgument("--output is required".to_string()))?;
    Ok((input_file(args)?, output))
}

/// Map an error to the process exit code.
fn error_to_exit_code(error: &LengthIndicatedError) -> u8 {
    match error {
        LengthIndicatedError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        LengthIndicatedError::ValidationFailed(_) => EXIT_VALIDATION_FAILURE,
        LengthIndicatedError::OpenSource { .. } => EXIT_IO_ERROR,
        LengthIndicatedError::OpenDestination { .. } => EXIT_IO_ERROR,
        LengthIndicatedError::Io(_) => EXIT_IO_ERROR,
        LengthIndicatedError::TruncatedFrame { .. } => EXIT_DATA_ERROR,
    }
}
