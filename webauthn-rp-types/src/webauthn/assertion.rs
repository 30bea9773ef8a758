//! Types specific to credential assertion (the authentication ceremony).

use serde::{Deserialize, Serialize};

use crate::{
    utils::serde::{ignore_unknown, ignore_unknown_opt_vec, maybe_stringified},
    webauthn::{PublicKeyCredential, PublicKeyCredentialDescriptor, UserVerificationRequirement},
    Bytes,
};

/// The envelope returned by the broker for a successful authentication.
pub type AuthenticatedPublicKeyCredential = PublicKeyCredential<AuthenticatorAssertionResponse>;

/// The expected input to `navigator.credentials.get` (or a platform
/// equivalent) when authenticating with an existing webauthn credential.
///
/// <https://w3c.github.io/webauthn/#sctn-credentialrequestoptions-extension>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequestOptions {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialRequestOptions,
}

/// Supplies a `get()` request with the data it needs to generate an
/// assertion. Only the challenge is mandatory.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrequestoptions>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialRequestOptions {
    /// The challenge the authenticator signs, along with other data, when
    /// producing the assertion.
    pub challenge: Bytes,

    /// Time in milliseconds the Relying Party is willing to wait for the
    /// call to complete. A hint only; enforcement is up to the client.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "maybe_stringified"
    )]
    pub timeout: Option<u32>,

    /// The RP ID claimed by the Relying Party. The authenticator only
    /// answers with credentials scoped to exactly this identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,

    /// Credentials acceptable for this ceremony, most preferred first. Empty
    /// or absent means any discoverable credential scoped to the RP ID may
    /// answer.
    #[serde(default, deserialize_with = "ignore_unknown_opt_vec")]
    pub allow_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,

    /// The user verification requirement for the `get()` operation.
    #[serde(default, deserialize_with = "ignore_unknown")]
    pub user_verification: UserVerificationRequirement,
}

/// An authenticator's proof of possession of a credential's private key: the
/// signed response to an authentication request.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorassertionresponse>
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponse {
    /// JSON serialization of the client data passed to the authenticator.
    /// The exact bytes must be preserved since the signed hash was computed
    /// over them.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// The raw authenticator data covered by the signature.
    pub authenticator_data: Bytes,

    /// The raw (DER encoded, for ES256) signature returned from the
    /// authenticator.
    pub signature: Bytes,

    /// The user handle the credential was registered under, if the
    /// authenticator returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<Bytes>,
}
