//! Error types for sitemap encoding and decoding.

use thiserror::Error;

/// Result type alias for sitemap-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading a sitemap document.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte sink or source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {}", p)).unwrap_or_default())]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// The document root is not the element this document kind expects.
    #[error("Unexpected root element: expected <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
    },

    /// A leaf element holds text that cannot be converted to its field type.
    #[error("Invalid <{element}> value {value:?}: {message}")]
    InvalidValue {
        element: String,
        value: String,
        message: String,
    },

    /// A required child element was not present.
    #[error("Missing <{element}> in <{parent}>")]
    MissingElement { parent: String, element: String },
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => match std::sync::Arc::try_unwrap(io) {
                Ok(io) => Error::Io(io),
                Err(shared) => Error::Io(std::io::Error::new(shared.kind(), shared.to_string())),
            },
            other => Error::XmlSyntax {
                message: other.to_string(),
                position: None,
            },
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

/// A failed [`WriteTo`](crate::WriteTo) or [`ReadFrom`](crate::ReadFrom)
/// transfer.
///
/// `bytes` is the exact number of bytes the sink accepted (or the decoder
/// consumed) before the failure.
#[derive(Debug, Error)]
#[error("{source} (after {bytes} bytes)")]
pub struct StreamError {
    pub bytes: u64,
    #[source]
    pub source: Error,
}

impl StreamError {
    pub fn new(bytes: u64, source: impl Into<Error>) -> Self {
        Self {
            bytes,
            source: source.into(),
        }
    }

    /// The underlying error, discarding the byte count.
    pub fn into_inner(self) -> Error {
        self.source
    }

    /// True when the failure came from the byte sink or source rather than
    /// from the XML itself.
    pub fn is_io(&self) -> bool {
        matches!(self.source, Error::Io(_))
    }
}
