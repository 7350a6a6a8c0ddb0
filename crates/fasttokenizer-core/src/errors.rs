//! # Error Types

/// Errors from fasttokenizer operations.
#[derive(Debug, thiserror::Error)]
pub enum FTError {
    /// The vocabulary or merge list is inconsistent.
    ///
    /// Raised only while building a [`crate::RankerTable`].
    #[error("malformed vocabulary: {0}")]
    MalformedVocabulary(String),

    /// A base symbol has no token, and no fallback was permitted.
    #[error("unknown symbol: byte {byte:#04x} at offset {offset} has no token")]
    UnknownSymbol {
        /// Byte offset of the symbol in the input.
        offset: usize,

        /// The first uncovered byte.
        byte: u8,
    },

    /// The input violates the boundary format.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A token id is not present in the vocabulary.
    #[error("unknown token: {token}")]
    UnknownToken {
        /// The unknown token, widened to `u64`.
        token: u64,
    },

    /// Token value out of range for the target type.
    #[error("token out of range")]
    TokenOutOfRange,

    /// A backing vocabulary resource was not configured or not found.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// A configuration value could not be understood.
    #[error("config error: {0}")]
    Config(String),

    /// A pre-tokenization pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// Parse error (base64, integer, json, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for fasttokenizer operations.
pub type FTResult<T> = core::result::Result<T, FTError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FTError::UnknownSymbol {
                offset: 3,
                byte: 0x21,
            }
            .to_string(),
            "unknown symbol: byte 0x21 at offset 3 has no token"
        );

        assert_eq!(
            FTError::MalformedVocabulary("bad merge".to_string()).to_string(),
            "malformed vocabulary: bad merge"
        );

        let io: FTError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, FTError::Io(_)));
        assert_eq!(io.to_string(), "gone");
    }
}
