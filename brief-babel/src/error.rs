use thiserror::Error;

use crate::common::flat_to_nested::ConversionError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// No registered format answers to this name or extension.
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ConversionError> for FormatError {
    fn from(err: ConversionError) -> Self {
        FormatError::ParseError(format!("malformed event stream: {err}"))
    }
}
