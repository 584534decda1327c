//! Memory Reference Traces.
//!
//! A trace is a text stream with one reference per line:
//!
//! ```text
//! # kind  address     [core]
//! I       0x400100
//! L       0x7ffe0010  1
//! S       4096
//! ```
//!
//! The kind is `I`/`IFETCH`, `L`/`LOAD` or `S`/`STORE` (case-insensitive).
//! Addresses are hexadecimal with a `0x` prefix, bare hexadecimal when they
//! contain a letter, or decimal otherwise. The core id defaults to 0. Blank
//! lines and everything after `#` are ignored.

use std::io::BufRead;

use crate::common::data::{AccessType, CoreId};
use crate::common::error::TraceError;

/// One parsed reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Access type.
    pub kind: AccessType,
    /// Byte address.
    pub addr: u64,
    /// Issuing core.
    pub core: CoreId,
}

impl TraceRecord {
    /// Parses one trace line.
    ///
    /// Returns `Ok(None)` for blank and comment-only lines.
    ///
    /// # Errors
    ///
    /// `TraceError::UnknownAccessKind` for an unrecognised kind and
    /// `TraceError::Malformed` for anything else, both carrying `lineno`.
    pub fn parse(line: &str, lineno: usize) -> Result<Option<Self>, TraceError> {
        let body = line.split_once('#').map_or(line, |(code, _)| code);
        let mut fields = body.split_whitespace();
        let Some(kind) = fields.next() else {
            return Ok(None);
        };
        let malformed = |reason: String| TraceError::Malformed { line: lineno, reason };

        let kind: AccessType = kind.parse().map_err(|_| TraceError::UnknownAccessKind {
            line: lineno,
            kind: kind.to_owned(),
        })?;
        let addr = fields
            .next()
            .ok_or_else(|| malformed("missing address".to_owned()))
            .and_then(|a| parse_addr(a).ok_or_else(|| malformed(format!("invalid address `{a}`"))))?;
        let core = match fields.next() {
            Some(c) => c
                .parse::<CoreId>()
                .map_err(|e| malformed(format!("invalid core id `{c}`: {e}")))?,
            None => 0,
        };
        if let Some(extra) = fields.next() {
            return Err(malformed(format!("unexpected field `{extra}`")));
        }

        Ok(Some(Self { kind, addr, core }))
    }
}

fn parse_addr(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if text.bytes().any(|b| b.is_ascii_alphabetic()) {
        u64::from_str_radix(text, 16).ok()
    } else {
        text.parse().ok()
    }
}

/// Iterator over the records of a trace, yielding one result per non-blank line.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: std::io::Lines<R>,
    lineno: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            lineno: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.lineno += 1;
            match TraceRecord::parse(&line, self.lineno) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
