//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::SourceMetadata;
use crate::error::{DoctorError, Result};
use crate::table::Table;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Pad short rows and truncate long ones instead of rejecting them.
    pub flexible: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            flexible: false,
        }
    }
}

/// Parses delimited text files into [`Table`]s.
///
/// Invalid UTF-8 is decoded lossily, so broken bytes show up as
/// replacement characters for the encoding rule to report instead of
/// failing the load.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| DoctorError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = self.delimiter_for(&contents)?;
        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let encoding = if std::str::from_utf8(strip_bom(&contents)).is_ok() {
            "utf-8"
        } else {
            "utf-8 (lossy)"
        };

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "Parsed file"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            encoding.to_string(),
            delimiter,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let bytes = text.as_bytes();
        let delimiter = self.delimiter_for(bytes)?;
        self.parse_bytes(bytes, delimiter)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) if d == self.config.quote || d == b'\n' || d == b'\r' => Err(
                DoctorError::InvalidDelimiter(format!("{:?} cannot be used", d as char)),
            ),
            Some(d) => Ok(d),
            None => detect_delimiter(strip_bom(bytes)),
        }
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(strip_bom(bytes));

        let mut records = reader.byte_records();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => decode_record(&record?),
                None => return Err(DoctorError::EmptyData("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in records {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }
            rows.push(decode_record(&result?));
        }

        let headers = if self.config.has_header {
            headers
        } else {
            // Generate column names from the first row.
            let width = rows
                .first()
                .map(|r| r.len())
                .ok_or_else(|| DoctorError::EmptyData("No data rows found".to_string()))?;
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(DoctorError::EmptyData("No columns found".to_string()));
        }

        if self.config.flexible {
            let expected = headers.len();
            for row in &mut rows {
                row.resize(expected, String::new());
            }
        }

        // Ragged rows surface as MalformedTable; the data row index is
        // zero-based and excludes the header.
        Table::new(headers, rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

fn decode_record(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .split(b'\n')
        .take(10)
        .filter_map(|l| l.ok())
        .map(|l| String::from_utf8_lossy(&l).into_owned())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DoctorError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus since
        // they rarely appear inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"Smith, J\";ok\n\"Doe, A\";fine";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers(), &["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let err = Parser::new()
            .parse_str("a,b\n1,2\n3\n")
            .unwrap_err();
        assert!(matches!(
            err,
            DoctorError::MalformedTable {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_flexible_pads_and_truncates() {
        let parser = Parser::with_config(ParserConfig {
            flexible: true,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("a,b\n1\n2,3,4\n").unwrap();

        assert_eq!(table.rows(), &[vec!["1", ""], vec!["2", "3"]]);
    }

    #[test]
    fn test_no_header_generates_names() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("1,2\n3,4\n").unwrap();

        assert_eq!(table.headers(), &["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_str("a\n1\n2\n3\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let data = b"\xEF\xBB\xBFid,name\n1,Jos\xE9\n";
        let table = Parser::new().parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers(), &["id", "name"]);
        assert_eq!(table.get(0, 1), Some("Jos\u{FFFD}"));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = Parser::new().parse_str("a,b\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Parser::new().parse_str(""),
            Err(DoctorError::EmptyData(_))
        ));
    }

    #[test]
    fn test_quote_as_delimiter_rejected() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b'"'),
            ..ParserConfig::default()
        });
        assert!(matches!(
            parser.parse_str("a\n1\n"),
            Err(DoctorError::InvalidDelimiter(_))
        ));
    }
}
