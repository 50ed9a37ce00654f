use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for quill operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Structural markers that must be balanced inside a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `$>` / `$<`
    Indent,
    /// `$[` / `$]`
    Statement,
    /// `${` / `$}`
    Block,
}

impl Marker {
    /// The placeholder that opens this marker.
    pub fn open(&self) -> &'static str {
        match self {
            Self::Indent => "$>",
            Self::Statement => "$[",
            Self::Block => "${",
        }
    }

    /// The placeholder that closes this marker.
    pub fn close(&self) -> &'static str {
        match self {
            Self::Indent => "$<",
            Self::Statement => "$]",
            Self::Block => "$}",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Indent => "indent",
            Self::Statement => "statement",
            Self::Block => "block",
        };
        write!(f, "{} ('{}' … '{}')", name, self.open(), self.close())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("unbalanced {marker}: {message}")]
    #[diagnostic(
        code(quill::structural),
        help("every opening marker needs its closing marker before the code block is built")
    )]
    Structural { marker: Marker, message: String },

    #[error("{message}")]
    #[diagnostic(code(quill::argument))]
    Argument { message: String },

    #[error("invalid {kind} '{name}'")]
    #[diagnostic(code(quill::invalid_name), help("{reason}"))]
    InvalidName {
        name: String,
        kind: String,
        reason: String,
    },
}

impl Error {
    /// Create a structural error for an unbalanced marker.
    pub fn structural(marker: Marker, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Structural {
            marker,
            message: message.into(),
        })
    }

    /// Create an argument error.
    pub fn argument(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Argument {
            message: message.into(),
        })
    }

    /// Create an invalid name error.
    pub fn invalid_name(
        name: impl Into<String>,
        kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidName {
            name: name.into(),
            kind: kind.into(),
            reason: reason.into(),
        })
    }
}
