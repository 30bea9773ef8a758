use std::fmt;

use crate::{encoding, utils::rand::random_fill, Bytes};

/// A single-use cryptographic challenge for one ceremony.
///
/// The challenge is signed by the authenticator along with the rest of the
/// ceremony data, which is what binds an assertion to the request that asked
/// for it. A challenge must never be reused across ceremonies nor derived
/// from predictable state.
///
/// <https://w3c.github.io/webauthn/#sctn-cryptographic-challenges>
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Challenge([u8; Self::LEN]);

impl Challenge {
    /// Byte length of every challenge.
    pub const LEN: usize = 32;

    /// Generate a fresh challenge from the OS entropy source.
    pub fn random() -> Self {
        let mut bytes = [0u8; Self::LEN];
        random_fill(&mut bytes);
        Self(bytes)
    }

    /// Read access to the raw challenge bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl From<[u8; Challenge::LEN]> for Challenge {
    fn from(bytes: [u8; Challenge::LEN]) -> Self {
        Self(bytes)
    }
}

impl From<&Challenge> for Bytes {
    fn from(challenge: &Challenge) -> Self {
        challenge.0.to_vec().into()
    }
}

/// Displays as the base64url transport encoding.
impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&encoding::base64url(&self.0))
    }
}
