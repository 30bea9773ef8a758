//! Thin decoding layer over [`ciborium`] for the CBOR subset authenticators
//! emit: maps with integer or text keys, byte strings, text strings and both
//! positive and negative integers (COSE key labels are negative integers).
//!
//! Decoding is total over well-formed input. Anything malformed or truncated
//! fails with [`ParseError::MalformedEncoding`] carrying the byte offset at
//! which the decoder gave up; no partial value is ever returned. The accessor
//! helpers turn shape mismatches (wrong type at a known key) into
//! [`ParseError::UnexpectedShape`] at decode time rather than leaving them for
//! later casts.

use ciborium::value::Value;

use crate::ParseError;

/// Decode a single CBOR item, rejecting trailing garbage.
pub fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    let mut reader = bytes;
    let value = ciborium::de::from_reader(&mut reader).map_err(|err| malformed(err, bytes.len()))?;
    if !reader.is_empty() {
        return Err(ParseError::MalformedEncoding {
            offset: Some(bytes.len() - reader.len()),
        });
    }
    Ok(value)
}

fn malformed<E: std::fmt::Debug>(err: ciborium::de::Error<E>, input_len: usize) -> ParseError {
    let offset = match err {
        ciborium::de::Error::Io(_) => Some(input_len),
        ciborium::de::Error::Syntax(at) => Some(at),
        ciborium::de::Error::Semantic(at, _) => at,
        ciborium::de::Error::RecursionLimitExceeded => None,
    };
    ParseError::MalformedEncoding { offset }
}

/// Look up the value at a text key of a CBOR map.
pub fn text_entry<'v>(value: &'v Value, key: &'static str) -> Result<&'v Value, ParseError> {
    entries(value)?
        .iter()
        .find_map(|(k, v)| (k.as_text() == Some(key)).then_some(v))
        .ok_or(ParseError::MissingField(key))
}

/// Look up the value at an integer key of a CBOR map. COSE labels are
/// integers, negative for key-type specific parameters.
pub fn int_entry<'v>(value: &'v Value, key: i64) -> Result<Option<&'v Value>, ParseError> {
    Ok(entries(value)?
        .iter()
        .find_map(|(k, v)| (k.as_integer() == Some(key.into())).then_some(v)))
}

/// Extract a byte string leaf.
pub fn as_bytes(value: &Value) -> Result<&[u8], ParseError> {
    value.as_bytes().map(Vec::as_slice).ok_or(ParseError::UnexpectedShape {
        expected: "a byte string",
    })
}

/// Extract a text string leaf.
pub fn as_text(value: &Value) -> Result<&str, ParseError> {
    value.as_text().ok_or(ParseError::UnexpectedShape {
        expected: "a text string",
    })
}

fn entries(value: &Value) -> Result<&[(Value, Value)], ParseError> {
    value.as_map().map(Vec::as_slice).ok_or(ParseError::UnexpectedShape { expected: "a map" })
}
