//! Loading tables from files and writing them back.

mod export;
mod parser;
mod source;

pub use export::{to_csv_string, write_csv, write_delimited};
pub use parser::{Parser, ParserConfig};
pub use source::SourceMetadata;
