//! Error types for template and expression compilation

use thiserror::Error;

/// Compile error
///
/// Every variant aborts the whole compile; no partial template is produced.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed boolean expression
    #[error(
        "invalid expression syntax{}: {message}",
        line_suffix(.line)
    )]
    ExpressionSyntax {
        message: String,
        /// Template line of the guarding directive, if any
        line: Option<usize>,
    },

    /// Malformed directive structure
    #[error("invalid directive syntax at line {line}: {message}")]
    DirectiveSyntax { message: String, line: usize },

    /// Nesting deeper than the configured limit
    #[error("nesting exceeds the limit of {limit}{}", line_suffix(.line))]
    NestingTooDeep { limit: usize, line: Option<usize> },

    /// Rejected configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reading template lines
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn expression(message: impl Into<String>) -> Self {
        Error::ExpressionSyntax {
            message: message.into(),
            line: None,
        }
    }

    pub(crate) fn directive(line: usize, message: impl Into<String>) -> Self {
        Error::DirectiveSyntax {
            message: message.into(),
            line,
        }
    }

    /// Attach a template line to errors raised while parsing a guard.
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            Error::ExpressionSyntax { message, line: None } => Error::ExpressionSyntax {
                message,
                line: Some(at),
            },
            Error::NestingTooDeep { limit, line: None } => Error::NestingTooDeep {
                limit,
                line: Some(at),
            },
            other => other,
        }
    }

    pub fn is_expression_syntax(&self) -> bool {
        matches!(self, Error::ExpressionSyntax { .. })
    }

    pub fn is_directive_syntax(&self) -> bool {
        matches!(self, Error::DirectiveSyntax { .. })
    }

    /// 1-based template line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::ExpressionSyntax { line, .. } | Error::NestingTooDeep { line, .. } => *line,
            Error::DirectiveSyntax { line, .. } => Some(*line),
            Error::InvalidConfig(_) | Error::Io(_) => None,
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Result type for compile operations
pub type Result<T> = std::result::Result<T, Error>;
