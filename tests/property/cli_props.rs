//! Property-based tests for CLI argument parsing
//!
//! Parsed arguments keep the values they were given, and `validate()` accepts
//! exactly the well-formed combinations.

use clap::Parser;
use proptest::prelude::*;
use std::path::PathBuf;

use length_indicated::cli::{Args, Mode};

/// Strategy for generating valid file paths
fn valid_file_path_strategy() -> impl Strategy<Value = PathBuf> {
    "[a-z][a-z0-9_]{0,10}\\.(csv|bin|txt)".prop_map(PathBuf::from)
}

/// Strategy for generating valid mode strings
fn valid_mode_string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("encode".to_string()), Just("decode".to_string())]
}

/// Strategy for generating invalid mode strings
fn invalid_mode_string_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}".prop_filter("Must not be a valid mode", |s| {
        s != "encode" && s != "decode"
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_mode_and_paths_preserved(
        mode_str in valid_mode_string_strategy(),
        file in valid_file_path_strategy(),
        output in valid_file_path_strategy(),
    ) {
        prop_assume!(file != output);

        let args = Args::try_parse_from([
            "length-indicated".to_string(),
            "--mode".to_string(),
            mode_str.clone(),
            "--file".to_string(),
            file.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ])
        .expect("Should parse valid args");

        let expected_mode = match mode_str.as_str() {
            "encode" => Mode::Encode,
            "decode" => Mode::Decode,
            _ => unreachable!(),
        };

        prop_assert_eq!(args.mode, Some(expected_mode));
        prop_assert_eq!(args.file.as_ref(), Some(&file));
        prop_assert_eq!(args.output.as_ref(), Some(&output));
        prop_assert!(args.validate().is_ok());
    }

    #[test]
    fn property_invalid_mode_rejected(mode_str in invalid_mode_string_strategy()) {
        let result = Args::try_parse_from([
            "length-indicated",
            "--mode",
            mode_str.as_str(),
            "--file",
            "in.csv",
            "--output",
            "out.bin",
        ]);
        prop_assert!(result.is_err());
    }

    #[test]
    fn property_dump_limit_preserved(
        file in valid_file_path_strategy(),
        limit in 0u64..1_000_000,
    ) {
        let args = Args::try_parse_from([
            "length-indicated".to_string(),
            "--dump".to_string(),
            "--file".to_string(),
            file.display().to_string(),
            "--limit".to_string(),
            limit.to_string(),
        ])
        .expect("Should parse valid args");

        prop_assert_eq!(args.limit, Some(limit));
        prop_assert!(args.validate().is_ok());
    }

    #[test]
    fn property_verbosity_counts_flags(count in 0usize..6) {
        let mut argv = vec!["length-indicated".to_string()];
        argv.extend(std::iter::repeat("-v".to_string()).take(count));
        argv.extend(["--validate".to_string(), "--file".to_string(), "x.bin".to_string()]);

        let args = Args::try_parse_from(&argv).expect("Should parse valid args");
        prop_assert_eq!(args.verbose as usize, count);
    }

    /// Without --file no operation validates.
    #[test]
    fn property_file_always_required(mode_str in valid_mode_string_strategy()) {
        let args = Args::try_parse_from([
            "length-indicated",
            "--mode",
            mode_str.as_str(),
            "--output",
            "out.bin",
        ])
        .expect("Should parse valid args");

        let err = args.validate().unwrap_err();
        prop_assert!(err.contains("--file is required"));
    }
}

#[test]
fn test_validate_and_dump_conflict() {
    let args =
        Args::try_parse_from(["length-indicated", "--validate", "--dump", "--file", "x.bin"])
            .unwrap();
    assert_eq!(
        args.validate().unwrap_err(),
        "--dump cannot be used with --validate"
    );
}

#[test]
fn test_short_flags() {
    let args = Args::try_parse_from([
        "length-indicated",
        "--mode",
        "encode",
        "-f",
        "in.csv",
        "-o",
        "out.bin",
    ])
    .unwrap();
    assert_eq!(args.file, Some(PathBuf::from("in.csv")));
    assert_eq!(args.output, Some(PathBuf::from("out.bin")));
    assert!(args.validate().is_ok());
}
