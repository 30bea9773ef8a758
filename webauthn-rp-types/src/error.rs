use std::fmt;

/// Failures while decoding the binary structures returned by an authenticator.
///
/// None of these are recoverable locally; they surface to the ceremony layer
/// which maps them to a user visible outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input was not well-formed CBOR (or JSON). The offset, when known,
    /// is the position in the input at which decoding failed.
    MalformedEncoding {
        /// Byte offset of the failure within the input, if the decoder
        /// reported one.
        offset: Option<usize>,
    },

    /// The value at a known key decoded but had the wrong type, e.g. a text
    /// string where a byte string is required.
    UnexpectedShape {
        /// Human readable description of the expected shape.
        expected: &'static str,
    },

    /// A map was well-formed but did not carry a required field.
    MissingField(&'static str),

    /// The `authData` buffer ended before a field it must contain.
    TruncatedAuthData,

    /// Credential key extraction was requested but the attested credential
    /// data flag is unset.
    MissingAttestedCredentialData,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::MalformedEncoding { offset: Some(at) } => {
                write!(f, "malformed encoding at byte offset {at}")
            }
            ParseError::MalformedEncoding { offset: None } => {
                write!(f, "malformed encoding")
            }
            ParseError::UnexpectedShape { expected } => {
                write!(f, "unexpected shape, expected {expected}")
            }
            ParseError::MissingField(field) => write!(f, "missing required field `{field}`"),
            ParseError::TruncatedAuthData => write!(f, "authenticator data is truncated"),
            ParseError::MissingAttestedCredentialData => {
                write!(f, "authenticator data carries no attested credential data")
            }
        }
    }
}

impl std::error::Error for ParseError {}
