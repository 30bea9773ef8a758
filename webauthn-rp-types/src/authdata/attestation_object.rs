use crate::{authdata::AuthenticatorData, cbor, ParseError};

/// The decoded attestation object returned on registration: a CBOR map with
/// the attestation format identifier, the attestation statement and the
/// authenticator data.
///
/// The attestation statement (`attStmt`) is deliberately not modeled: this
/// Relying Party core always requests the `none` conveyance, so the statement
/// carries no trust information and trust-chain validation is out of scope.
///
/// <https://w3c.github.io/webauthn/#attestation-object>
#[derive(Debug)]
pub struct AttestationObject {
    /// The attestation statement format identifier, `"none"` for the
    /// ceremonies this crate requests.
    pub fmt: String,

    /// The parsed authenticator data, carrying the new credential's id and
    /// public key.
    pub auth_data: AuthenticatorData,
}

impl AttestationObject {
    /// Decode an attestation object from its CBOR bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let value = cbor::decode(bytes)?;
        let fmt = cbor::as_text(cbor::text_entry(&value, "fmt")?)?.to_owned();
        let auth_data =
            AuthenticatorData::from_slice(cbor::as_bytes(cbor::text_entry(&value, "authData")?)?)?;
        Ok(Self { fmt, auth_data })
    }
}
