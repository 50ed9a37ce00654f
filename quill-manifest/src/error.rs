use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("pass the path of a quill.toml or quill.json manifest"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(quill::parse_error))]
    Toml {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(quill::parse_error))]
    Json {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(quill::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("'{name}' is a Java reserved keyword")]
    #[diagnostic(
        code(quill::reserved_keyword),
        help("rename the {context} '{name}', e.g. to '{name}Value'")
    )]
    ReservedKeyword {
        #[source_code]
        src: NamedSource<String>,
        #[label("reserved keyword used here")]
        span: Option<SourceSpan>,
        name: String,
        context: String,
    },

    #[error("invalid {context} name '{name}'")]
    #[diagnostic(code(quill::invalid_identifier), help("{reason}"))]
    InvalidIdentifier {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid identifier")]
        span: Option<SourceSpan>,
        name: String,
        context: String,
        reason: String,
    },

    #[error("invalid type '{ty}' in {context}")]
    #[diagnostic(
        code(quill::invalid_type),
        help("write types as Java source, e.g. 'int', 'java.util.List<java.lang.String>'")
    )]
    InvalidType {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        ty: String,
        context: String,
        reason: String,
    },

    #[error("invalid declaration in {context}")]
    #[diagnostic(code(quill::declaration))]
    Declaration {
        context: String,
        #[source]
        source: Box<quill_core::Error>,
    },
}

impl Error {
    /// Create a parse error from a toml error with source context
    pub fn toml(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Toml {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a parse error from a JSON error, locating its line and column
    pub fn json(source: serde_json::Error, src: &str, filename: &str) -> Box<Self> {
        let span = offset_of(src, source.line(), source.column()).map(|at| SourceSpan::from((at, 1)));
        Box::new(Error::Json {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a validation error with source context
    pub fn validation(
        message: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::Validation {
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: message.into(),
        })
    }

    /// Create a reserved keyword error
    pub fn reserved_keyword(
        name: impl Into<String>,
        context: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::ReservedKeyword {
            src: NamedSource::new(filename, src.to_string()),
            span,
            name: name.into(),
            context: context.into(),
        })
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(
        name: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::InvalidIdentifier {
            src: NamedSource::new(filename, src.to_string()),
            span,
            name: name.into(),
            context: context.into(),
            reason: reason.into(),
        })
    }

    /// Create an invalid type error
    pub fn invalid_type(
        ty: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::InvalidType {
            src: NamedSource::new(filename, src.to_string()),
            span,
            ty: ty.into(),
            context: context.into(),
            reason: reason.into(),
        })
    }

    /// Wrap an error raised while building declarations
    pub fn declaration(context: impl Into<String>, source: Box<quill_core::Error>) -> Box<Self> {
        Box::new(Error::Declaration {
            context: context.into(),
            source,
        })
    }
}

/// Byte offset of a one-based line and column.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let start: usize = src.split_inclusive('\n').take(line - 1).map(str::len).sum();
    let offset = start + column.saturating_sub(1);
    (offset <= src.len()).then_some(offset)
}
