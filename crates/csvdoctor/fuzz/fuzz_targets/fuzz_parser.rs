//! Fuzz target for the CSV/TSV loader.
//!
//! This fuzzer tests that the loader:
//! 1. Never panics on malformed or non-UTF-8 input
//! 2. Only returns rectangular tables
//! 3. Produces tables the exporter can write back out

#![no_main]

use csvdoctor::input::to_csv_string;
use csvdoctor::{Parser, ParserConfig};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    // Auto-detected delimiter, straight from memory
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(table) = Parser::new().parse_str(text) {
            assert!(table.rows().iter().all(|r| r.len() == table.column_count()));
            let _ = to_csv_string(&table, b',');
        }
    }

    // Fixed delimiter with padding of ragged rows
    let flexible = Parser::with_config(ParserConfig {
        flexible: true,
        ..Default::default()
    });
    if let Ok(table) = flexible.parse_bytes(data, b',') {
        assert!(table.rows().iter().all(|r| r.len() == table.column_count()));
    }

    // Full file path, including hashing and metadata
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            if let Ok((table, source)) = Parser::new().parse_file(temp_file.path()) {
                assert_eq!(source.row_count, table.row_count());
                assert_eq!(source.size_bytes, data.len() as u64);
            }
        }
    }
});
