//! Request and response types for the two webauthn ceremonies, as serialized
//! to and from the platform credential broker.
//!
//! <https://w3c.github.io/webauthn>

use serde::{Deserialize, Serialize};

mod assertion;
mod attestation;
mod common;

// re-export types
pub use self::{assertion::*, attestation::*, common::*};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::AuthenticatorAssertionResponse {}
    impl Sealed for super::AuthenticatorAttestationResponse {}
}

/// Marker trait for response types
pub trait AuthenticatorResponse: sealed::Sealed {}

impl AuthenticatorResponse for AuthenticatorAssertionResponse {}
impl AuthenticatorResponse for AuthenticatorAttestationResponse {}

/// The envelope returned by the credential broker after a successful creation
/// or assertion of a credential.
///
/// Use the aliases depending on which ceremony produced it:
/// * registration: [`CreatedPublicKeyCredential`]
/// * authentication: [`AuthenticatedPublicKeyCredential`]
///
/// <https://w3c.github.io/webauthn/#iface-pkcredential>
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredential<R: AuthenticatorResponse> {
    /// The credential ID, chosen by the authenticator. This is the base64url
    /// encoded data of [`Self::raw_id`] and is what a Relying Party keys its
    /// credential records on; it is expected to be globally unique.
    pub id: String,

    /// The raw bytes of the credential ID, see [`Self::id`].
    pub raw_id: crate::Bytes,

    /// Always [`PublicKeyCredentialType::PublicKey`] for the ceremonies this
    /// crate models.
    #[serde(rename = "type")]
    pub ty: PublicKeyCredentialType,

    /// The authenticator's answer: an [`AuthenticatorAttestationResponse`]
    /// for registration, an [`AuthenticatorAssertionResponse`] for
    /// authentication.
    pub response: R,
}
