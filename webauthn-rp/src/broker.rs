//! The platform credential broker seam.
//!
//! The broker is whatever platform surface actually talks to the
//! authenticator. The ceremony hands it serialized request options and gets
//! back the JSON envelope the platform produced, untouched. Keeping the seam
//! at the JSON string level means the ceremony itself owns all decoding and
//! its failure taxonomy, and tests can stand in a broker with a few lines.

use std::fmt;

use async_trait::async_trait;
use webauthn_rp_types::webauthn::{CredentialCreationOptions, CredentialRequestOptions};

/// Failures reported by the platform credential broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// No credential on this device can satisfy the request.
    NoCredential,

    /// The user dismissed the platform prompt.
    Cancelled,

    /// The broker surface is not available on this device.
    Unavailable,

    /// Any other platform-reported failure, with the platform's own message.
    Platform(String),
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BrokerError::NoCredential => write!(f, "no matching credential is available"),
            BrokerError::Cancelled => write!(f, "the user cancelled the request"),
            BrokerError::Unavailable => write!(f, "the credential broker is unavailable"),
            BrokerError::Platform(message) => write!(f, "platform error: {message}"),
        }
    }
}

impl std::error::Error for BrokerError {}

/// A platform surface that can run credential ceremonies.
///
/// Implementations return the platform's response envelope as the JSON text
/// it was produced in; the ceremony decodes it.
#[async_trait]
pub trait CredentialBroker {
    /// Ask the platform to create a new credential.
    async fn create_credential(
        &self,
        options: &CredentialCreationOptions,
    ) -> Result<String, BrokerError>;

    /// Ask the platform to assert with an existing credential.
    async fn get_credential(
        &self,
        options: &CredentialRequestOptions,
    ) -> Result<String, BrokerError>;
}
