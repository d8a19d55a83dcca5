// Input parsers: benchmark text and projection expressions

pub mod bench;
pub mod lexer;
pub mod projection;

// Public API re-exports
pub use bench::{read_str, BenchFile, BenchReader, SyntaxError};
pub use projection::parse_fields;
