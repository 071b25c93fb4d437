use super::Format;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed CTFile data at line {line}{}: {details}", describe_columns(.columns))]
    Format {
        line: usize,
        columns: Option<Range<usize>>,
        content: String,
        details: String,
    },

    #[error("the '{0}' format is not supported for this read operation")]
    UnsupportedReadFormat(Format),

    #[error("the '{0}' format is not supported for this write operation")]
    UnsupportedWriteFormat(Format),
}

fn describe_columns(columns: &Option<Range<usize>>) -> String {
    match columns {
        Some(r) => format!(", columns {}-{}", r.start + 1, r.end),
        None => String::new(),
    }
}

impl Error {
    /// A format error that concerns the line as a whole.
    pub fn format(line: usize, content: &str, details: impl Into<String>) -> Self {
        Self::Format {
            line,
            columns: None,
            content: content.to_string(),
            details: details.into(),
        }
    }

    /// A format error pinned to a column range (0-based, end exclusive).
    pub fn field(
        line: usize,
        columns: Range<usize>,
        content: &str,
        details: impl Into<String>,
    ) -> Self {
        Self::Format {
            line,
            columns: Some(columns),
            content: content.to_string(),
            details: details.into(),
        }
    }

    /// Line number of a format error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } => Some(*line),
            _ => None,
        }
    }
}
