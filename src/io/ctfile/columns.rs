use crate::io::error::Error;
use std::ops::Range;

/// Fixed-column view of one input line.
///
/// Columns are 0-based byte offsets with an exclusive end. Fields that run
/// past the end of the line are read up to the end, and fields that start
/// past it are blank.
pub(crate) struct Columns<'a> {
    line: &'a str,
    line_no: usize,
}

impl<'a> Columns<'a> {
    pub fn new(line: &'a str, line_no: usize) -> Self {
        Self { line, line_no }
    }

    pub fn require_width(&self, width: usize, what: &str) -> Result<(), Error> {
        if self.line.len() < width {
            return Err(Error::format(
                self.line_no,
                self.line,
                format!(
                    "{what} must be at least {width} columns wide, found {}",
                    self.line.len()
                ),
            ));
        }
        Ok(())
    }

    /// Trimmed text of a field.
    pub fn text(&self, range: Range<usize>, what: &str) -> Result<&'a str, Error> {
        let end = range.end.min(self.line.len());
        if range.start >= end {
            return Ok("");
        }
        self.line
            .get(range.start..end)
            .map(str::trim)
            .ok_or_else(|| self.error(range, format!("{what} is not plain ASCII")))
    }

    /// Unsigned integer field; blank reads as zero.
    pub fn uint(&self, range: Range<usize>, what: &str) -> Result<u32, Error> {
        let text = self.text(range.clone(), what)?;
        if text.is_empty() {
            return Ok(0);
        }
        text.parse::<u32>()
            .map_err(|_| self.error(range, format!("invalid {what} '{text}'")))
    }

    /// Floating point field; blank is an error.
    pub fn float(&self, range: Range<usize>, what: &str) -> Result<f64, Error> {
        let text = self.text(range.clone(), what)?;
        text.parse::<f64>()
            .map_err(|_| self.error(range, format!("invalid {what} '{text}'")))
    }

    pub fn error(&self, range: Range<usize>, details: impl Into<String>) -> Error {
        Error::field(self.line_no, range, self.line, details)
    }
}
