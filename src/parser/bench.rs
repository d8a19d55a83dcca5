// Benchmark text format reader
//
// Lines are either file configuration ("key: value"), results
// ("BenchmarkName iters value unit [value unit...]"), unit metadata
// ("Unit unit key=value...") or ignored text.

use super::lexer::{sp, word};
use crate::record::{Measurement, Record};
use crate::units::{self, Assumption, Better, UnitMetadataMap};
use anyhow::{Context, Result};
use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, satisfy},
    combinator::{recognize, rest},
    multi::many0,
    sequence::pair,
    IResult,
};
use std::fmt;
use std::io::BufRead;

/// A malformed line. Reported, but does not stop reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

/// Everything read from one or more inputs.
#[derive(Debug, Default)]
pub struct BenchFile {
    pub records: Vec<Record>,
    pub units: UnitMetadataMap,
    pub errors: Vec<SyntaxError>,
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Config { key: String, value: String },
    Result {
        name: String,
        iters: u64,
        values: Vec<(f64, String)>,
    },
    Unit { unit: String, metadata: Vec<(String, String)> },
    Other,
}

/// A configuration key: a lowercase letter followed by anything but
/// whitespace, uppercase letters or ':'.
fn config_key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_lowercase()),
        take_while(|c: char| c != ':' && !c.is_whitespace() && !c.is_uppercase()),
    ))(input)
}

fn config_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, key) = config_key(input)?;
    let (input, _) = char(':')(input)?;
    let (input, value) = rest(input)?;
    Ok((input, (key, value)))
}

fn fields(input: &str) -> IResult<&str, Vec<&str>> {
    many0(sp(word))(input)
}

/// Classify a single line. Errors are messages for malformed results.
pub fn parse_line(line: &str) -> std::result::Result<Line, String> {
    let line = line.trim_end_matches(['\r', '\n']);

    // 1. Configuration
    if let Ok((_, (key, value))) = config_line(line) {
        if value.is_empty() || value.starts_with([' ', '\t']) {
            return Ok(Line::Config {
                key: key.to_string(),
                value: value.trim().to_string(),
            });
        }
    }

    // 2. Unit metadata
    if let Ok((after, _)) = tag::<_, _, nom::error::Error<&str>>("Unit")(line) {
        if after.starts_with([' ', '\t']) {
            return parse_unit_line(after);
        }
    }

    // 3. Results. "Benchmarking..." and similar prose is not a result.
    let Ok((after, _)) = tag::<_, _, nom::error::Error<&str>>("Benchmark")(line) else {
        return Ok(Line::Other);
    };
    if after.starts_with(|c: char| c.is_lowercase()) {
        return Ok(Line::Other);
    }
    parse_result_line(line)
}

fn parse_unit_line(input: &str) -> std::result::Result<Line, String> {
    let (_, toks) = fields(input).map_err(|e| e.to_string())?;
    let Some((unit, pairs)) = toks.split_first() else {
        return Err("missing unit".to_string());
    };
    let mut metadata = Vec::new();
    for tok in pairs {
        let Some((k, v)) = tok.split_once('=') else {
            return Err(format!("expected key=value, got {:?}", tok));
        };
        metadata.push((k.to_string(), v.to_string()));
    }
    Ok(Line::Unit {
        unit: unit.to_string(),
        metadata,
    })
}

fn parse_result_line(line: &str) -> std::result::Result<Line, String> {
    let (_, toks) = fields(line).map_err(|e| e.to_string())?;
    let mut toks = toks.into_iter();

    // The caller checked the prefix.
    let name = toks
        .next()
        .and_then(|t| t.strip_prefix("Benchmark"))
        .unwrap_or_default()
        .to_string();

    let iters = match toks.next() {
        Some(t) => t
            .parse::<u64>()
            .map_err(|e| format!("parsing iteration count: {}", e))?,
        None => return Err("missing iteration count".to_string()),
    };

    let rest: Vec<&str> = toks.collect();
    if rest.is_empty() {
        return Err("missing measurements".to_string());
    }
    let mut values = Vec::new();
    for chunk in rest.chunks(2) {
        let [value, unit] = chunk else {
            return Err("missing units".to_string());
        };
        let value = value
            .parse::<f64>()
            .map_err(|e| format!("parsing measurement: {}", e))?;
        values.push((value, unit.to_string()));
    }

    Ok(Line::Result { name, iters, values })
}

/// Reads benchmark results from a sequence of inputs. Configuration resets
/// between inputs; unit metadata accumulates.
#[derive(Debug, Default)]
pub struct BenchReader {
    out: BenchFile,
}

impl BenchReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every line of `reader`, naming it `file` in syntax errors.
    pub fn read<R: BufRead>(&mut self, file: &str, reader: R) -> Result<()> {
        let mut config: Vec<(String, String)> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read {}", file))?;
            let line_no = i + 1;

            let parsed = match parse_line(&line) {
                Ok(parsed) => parsed,
                Err(message) => {
                    self.syntax_error(file, line_no, message);
                    continue;
                }
            };

            match parsed {
                Line::Config { key, value } => set_config(&mut config, key, value),
                Line::Result { name, iters, values } => {
                    let values = values
                        .into_iter()
                        .map(|(value, unit)| {
                            let (factor, tidy) = units::tidy_unit(&unit);
                            Measurement {
                                value: value * factor,
                                unit: tidy,
                                orig_unit: unit,
                            }
                        })
                        .collect();
                    self.out.records.push(Record {
                        config: config.clone(),
                        full_name: name,
                        iters,
                        values,
                    });
                }
                Line::Unit { unit, metadata } => {
                    if let Err(message) = self.unit_metadata(&unit, &metadata) {
                        self.syntax_error(file, line_no, message);
                    }
                }
                Line::Other => {}
            }
        }

        tracing::debug!(file, records = self.out.records.len(), "read benchmark input");
        Ok(())
    }

    fn unit_metadata(&mut self, unit: &str, metadata: &[(String, String)]) -> std::result::Result<(), String> {
        let (_, tidy) = units::tidy_unit(unit);
        let entry = self.out.units.entry(tidy).or_default();
        for (key, value) in metadata {
            match key.as_str() {
                "assume" => {
                    entry.assume = Assumption::parse(value)
                        .ok_or_else(|| format!("invalid assume value {:?}", value))?;
                }
                "better" => {
                    entry.better = Better::parse(value)
                        .ok_or_else(|| format!("invalid better value {:?}", value))?;
                }
                _ => tracing::trace!(unit, key = key.as_str(), "ignoring unit metadata"),
            }
        }
        Ok(())
    }

    fn syntax_error(&mut self, file: &str, line: usize, message: String) {
        let err = SyntaxError {
            file: file.to_string(),
            line,
            message,
        };
        tracing::warn!("{}", err);
        self.out.errors.push(err);
    }

    pub fn finish(self) -> BenchFile {
        self.out
    }
}

/// Set or, for an empty value, delete a configuration key. Existing keys
/// keep their position.
fn set_config(config: &mut Vec<(String, String)>, key: String, value: String) {
    let pos = config.iter().position(|(k, _)| *k == key);
    match (pos, value.is_empty()) {
        (Some(i), true) => {
            config.remove(i);
        }
        (Some(i), false) => config[i].1 = value,
        (None, true) => {}
        (None, false) => config.push((key, value)),
    }
}

/// Read a single input from a string.
pub fn read_str(file: &str, input: &str) -> Result<BenchFile> {
    let mut reader = BenchReader::new();
    reader.read(file, input.as_bytes())?;
    Ok(reader.finish())
}
