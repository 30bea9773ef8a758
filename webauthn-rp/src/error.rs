use std::fmt;

use webauthn_rp_types::ParseError;

use crate::BrokerError;

/// Failures while resolving a COSE key into a usable public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    /// The key is not of the single supported shape: EC2, ES256, P-256.
    UnsupportedKeyType,

    /// The x/y coordinates do not name an affine point on P-256.
    InvalidCoordinate,

    /// A persisted DER key could not be decoded back into a verifying key.
    MalformedDer,
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyError::UnsupportedKeyType => {
                write!(f, "credential key is not an EC2 ES256 key on P-256")
            }
            KeyError::InvalidCoordinate => {
                write!(f, "credential key coordinates are not a point on the curve")
            }
            KeyError::MalformedDer => write!(f, "persisted public key is not valid DER"),
        }
    }
}

impl std::error::Error for KeyError {}

/// Failures while checking an assertion signature.
///
/// A signature that simply does not verify is not an error; only a signature
/// whose encoding cannot be parsed at all is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature bytes are not a valid DER encoded ECDSA signature.
    InvalidSignatureEncoding,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignatureError::InvalidSignatureEncoding => {
                write!(f, "assertion signature is not valid DER")
            }
        }
    }
}

impl std::error::Error for SignatureError {}

/// Mismatches between the collected client data echoed by the broker and the
/// ceremony that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientDataError {
    /// The `type` member names the other ceremony.
    UnexpectedType,

    /// The echoed challenge is not the one this ceremony issued.
    ChallengeMismatch,
}

impl fmt::Display for ClientDataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientDataError::UnexpectedType => {
                write!(f, "client data was collected for a different ceremony type")
            }
            ClientDataError::ChallengeMismatch => {
                write!(f, "client data echoes a challenge this ceremony did not issue")
            }
        }
    }
}

impl std::error::Error for ClientDataError {}

/// Hard failures of a ceremony. Soft "no usable credential" outcomes are not
/// errors; they are the [`AssertionOutcome::NoCredential`] variant so callers
/// must handle them explicitly.
///
/// [`AssertionOutcome::NoCredential`]: crate::AssertionOutcome::NoCredential
#[derive(Debug, PartialEq)]
pub enum CeremonyError {
    /// The broker envelope or a binary structure within it did not decode.
    Parse(ParseError),

    /// The echoed client data does not belong to this ceremony.
    ClientData(ClientDataError),

    /// The credential public key could not be resolved.
    Key(KeyError),

    /// The assertion signature bytes were malformed.
    Signature(SignatureError),

    /// The broker call itself failed.
    Broker(BrokerError),
}

impl fmt::Display for CeremonyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CeremonyError::Parse(err) => write!(f, "ceremony response did not parse: {err}"),
            CeremonyError::ClientData(err) => write!(f, "client data rejected: {err}"),
            CeremonyError::Key(err) => write!(f, "credential key rejected: {err}"),
            CeremonyError::Signature(err) => write!(f, "assertion rejected: {err}"),
            CeremonyError::Broker(err) => write!(f, "credential broker failed: {err}"),
        }
    }
}

impl std::error::Error for CeremonyError {}

impl From<ParseError> for CeremonyError {
    fn from(err: ParseError) -> Self {
        CeremonyError::Parse(err)
    }
}

impl From<ClientDataError> for CeremonyError {
    fn from(err: ClientDataError) -> Self {
        CeremonyError::ClientData(err)
    }
}

impl From<KeyError> for CeremonyError {
    fn from(err: KeyError) -> Self {
        CeremonyError::Key(err)
    }
}

impl From<SignatureError> for CeremonyError {
    fn from(err: SignatureError) -> Self {
        CeremonyError::Signature(err)
    }
}

impl From<BrokerError> for CeremonyError {
    fn from(err: BrokerError) -> Self {
        CeremonyError::Broker(err)
    }
}
