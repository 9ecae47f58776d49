//! Block I/O trace reader
//!
//! A trace is a text file with one `address,op` record per line. Addresses
//! are non-negative integers, ops are `R` or `W` in either case. Blank lines
//! are skipped; fields after the second are ignored.

pub mod error;

use crate::trace::error::{TraceError, TraceResult};
use crate::types::{Address, Op, TraceRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Parses one trace line. `line_no` is 1-based and only used for errors.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line_no: usize, line: &str) -> TraceResult<Option<TraceRecord>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(',');
    let addr_field = fields.next().map(str::trim).unwrap_or_default();
    let op_field = match fields.next() {
        Some(op) => op.trim(),
        None => return Err(TraceError::MissingField { line: line_no }),
    };

    let address: Address = addr_field
        .parse()
        .map_err(|_| TraceError::InvalidAddress {
            line: line_no,
            value: addr_field.to_string(),
        })?;

    let op = Op::from_code(op_field).ok_or_else(|| TraceError::InvalidOp {
        line: line_no,
        value: op_field.to_string(),
    })?;

    Ok(Some(TraceRecord::new(address, op)))
}

/// Streaming reader over any buffered source
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = TraceResult<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;
            match parse_line(self.line_no, &line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Reads a whole trace file before replay starts
pub fn load_trace(path: impl AsRef<Path>) -> TraceResult<Vec<TraceRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = TraceReader::new(BufReader::new(file)).collect::<TraceResult<Vec<_>>>()?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded trace");
    Ok(records)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
