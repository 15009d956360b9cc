//! Property-based tests for length-indicated framing
//!
//! Round trips through files and in-memory streams, frame size accounting,
//! and truncation detection at every possible cut point.

use proptest::prelude::*;
use std::io::Cursor;
use tempfile::tempdir;

use length_indicated::{
    convert_from_length_indicated, convert_to_length_indicated, encode_frame,
    read_length_indicated_record, FrameReader, FrameWriter, LengthIndicatedError,
    LENGTH_FIELD_SIZE,
};

/// Strategy for a single line: any bytes except the newline delimiter
fn line_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        // Arbitrary bytes, including non-UTF-8 and control characters
        prop::collection::vec(any::<u8>().prop_filter("no newline", |b| *b != b'\n'), 0..64),
        // CSV-looking rows
        "[a-zA-Z0-9 ]{0,8}(,[a-zA-Z0-9 \"]{0,8}){0,5}".prop_map(String::into_bytes),
        // Blank lines
        Just(Vec::new()),
    ]
}

fn lines_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(line_strategy(), 0..20)
}

fn join_lines(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut text = Vec::new();
    for line in lines {
        text.extend_from_slice(line);
        text.push(b'\n');
    }
    text
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Encoding a file and decoding frame by frame returns every line in order.
    #[test]
    fn prop_file_round_trip(lines in lines_strategy()) {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("in.csv");
        let binary = temp_dir.path().join("out.bin");
        std::fs::write(&source, join_lines(&lines)).unwrap();

        let stats = convert_to_length_indicated(&source, &binary).unwrap();
        prop_assert_eq!(stats.total_records, lines.len() as u64);

        let decoded: Vec<Vec<u8>> = FrameReader::open(&binary)
            .unwrap()
            .map(|r| r.map(|record| record.into_bytes()))
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(decoded, lines);
    }

    /// Encode followed by decode reproduces a newline-terminated text file exactly.
    #[test]
    fn prop_text_round_trip(lines in lines_strategy()) {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("in.csv");
        let binary = temp_dir.path().join("out.bin");
        let restored = temp_dir.path().join("restored.csv");
        let text = join_lines(&lines);
        std::fs::write(&source, &text).unwrap();

        convert_to_length_indicated(&source, &binary).unwrap();
        convert_from_length_indicated(&binary, &restored).unwrap();

        prop_assert_eq!(std::fs::read(&restored).unwrap(), text);
    }

    /// Each read advances the stream by exactly the length field plus payload.
    #[test]
    fn prop_read_advances_by_frame_size(lines in lines_strategy()) {
        let mut writer = FrameWriter::new(Vec::new());
        for line in &lines {
            writer.write_record(line).unwrap();
        }
        let bytes = writer.into_inner();

        let mut cursor = Cursor::new(bytes);
        for line in &lines {
            let start = cursor.position();
            let record = read_length_indicated_record(&mut cursor).unwrap().unwrap();
            prop_assert_eq!(record.as_bytes(), line.as_slice());
            prop_assert_eq!(
                cursor.position() - start,
                (LENGTH_FIELD_SIZE + line.len()) as u64
            );
        }
        prop_assert!(read_length_indicated_record(&mut cursor).unwrap().is_none());
    }

    /// The length field always equals the payload byte count.
    #[test]
    fn prop_length_field_matches_payload(line in line_strategy()) {
        let frame = encode_frame(&line);
        let mut field = [0u8; LENGTH_FIELD_SIZE];
        field.copy_from_slice(&frame[..LENGTH_FIELD_SIZE]);

        prop_assert_eq!(u64::from_le_bytes(field), line.len() as u64);
        prop_assert_eq!(&frame[LENGTH_FIELD_SIZE..], line.as_slice());
    }

    /// Cutting a stream anywhere but a frame boundary yields the complete
    /// frames before the cut and then a truncation error.
    #[test]
    fn prop_cut_stream_is_truncated(
        lines in prop::collection::vec(line_strategy(), 1..8),
        cut_seed in any::<prop::sample::Index>(),
    ) {
        let mut bytes = Vec::new();
        let mut boundaries = vec![0usize];
        for line in &lines {
            bytes.extend(encode_frame(line));
            boundaries.push(bytes.len());
        }

        let cut = cut_seed.index(bytes.len());
        prop_assume!(!boundaries.contains(&cut));
        let complete = boundaries.iter().filter(|b| **b <= cut).count() - 1;

        let mut reader = FrameReader::new(Cursor::new(bytes[..cut].to_vec()));
        for line in lines.iter().take(complete) {
            let record = reader.read_next().unwrap().unwrap();
            prop_assert_eq!(record.as_bytes(), line.as_slice());
        }

        let is_truncated = matches!(
            reader.read_next(),
            Err(LengthIndicatedError::TruncatedFrame { offset, .. })
                if offset == boundaries[complete] as u64
        );
        prop_assert!(is_truncated);
    }
}
