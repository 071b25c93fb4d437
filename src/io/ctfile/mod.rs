//! CTFile (MDL molfile and rxnfile, V2000) parsing.
//!
//! Every field is read by column position, never by whitespace splitting:
//! adjacent numeric fields in CTFiles may touch (`-1.526899999.0001`), and
//! blank integer fields are meaningful zeros. Any malformed field aborts the
//! parse with [`Error::Format`] carrying the line number, the column range
//! and the offending text.

use super::error::Error;
use crate::model::molecule::Structure;
use std::io::BufRead;

mod columns;
pub mod mol;
pub mod rxn;

/// A parser producing a [`Structure`] from CTFile text.
pub trait CtFileParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Structure, Error>;
}

/// Parses a single molfile into a centered [`Structure::Molecule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MolParser;

impl CtFileParser for MolParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Structure, Error> {
        let mut lines = LineReader::new(reader);
        mol::parse_mol(&mut lines).map(Structure::Molecule)
    }
}

/// Parses a rxnfile into a [`Structure::Reaction`], laying participants out
/// left to right `spacing` apart.
#[derive(Debug, Clone, Copy)]
pub struct RxnParser {
    spacing: f64,
}

impl RxnParser {
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }
}

impl CtFileParser for RxnParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Structure, Error> {
        let mut lines = LineReader::new(reader);
        rxn::parse_rxn(&mut lines, self.spacing).map(Structure::Reaction)
    }
}

/// Line source that tracks 1-based line numbers for error reporting.
///
/// Bytes that are not valid UTF-8 (legacy Latin-1 headers, for instance) are
/// replaced rather than rejected, so they only matter if a parsed field
/// contains them.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Number of the line most recently returned.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Reads the next line without its terminator; end of input is a format
    /// error naming `expected`.
    pub fn next_line(&mut self, expected: &str) -> Result<String, Error> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(Error::format(
                self.line_no + 1,
                "",
                format!("unexpected end of input, expected {expected}"),
            ));
        }
        self.line_no += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(String::from_utf8_lossy(&self.buf).into_owned())
    }
}
