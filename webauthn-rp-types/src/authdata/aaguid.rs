/// An Authenticator Attestation GUID: a 128-bit identifier indicating the
/// make and model of an authenticator.
///
/// Platform authenticators doing `none` attestation typically report the
/// all-zero AAGUID, so an empty constructor is provided.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-model>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Aaguid(pub [u8; Self::LEN]);

impl Aaguid {
    /// Byte length of an AAGUID.
    pub const LEN: usize = 16;

    /// The all-zero AAGUID.
    pub const fn new_empty() -> Self {
        Self([0; Self::LEN])
    }
}

impl Default for Aaguid {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl From<[u8; Aaguid::LEN]> for Aaguid {
    fn from(inner: [u8; Aaguid::LEN]) -> Self {
        Aaguid(inner)
    }
}
