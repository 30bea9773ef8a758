//! Types specific to credential creation (the registration ceremony).

use coset::iana;
use serde::{Deserialize, Serialize};

use crate::{
    utils::serde::{i64_to_iana, ignore_unknown, ignore_unknown_opt_vec, maybe_stringified},
    webauthn::{
        AuthenticatorAttachment, PublicKeyCredential, PublicKeyCredentialDescriptor,
        PublicKeyCredentialType, UserVerificationRequirement,
    },
    Bytes,
};

/// The envelope returned by the broker for a successful registration.
pub type CreatedPublicKeyCredential = PublicKeyCredential<AuthenticatorAttestationResponse>;

/// The expected input to `navigator.credentials.create` (or a platform
/// equivalent) when asking for a new webauthn credential.
///
/// <https://w3c.github.io/webauthn/#sctn-credentialcreationoptions-extension>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCreationOptions {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialCreationOptions,
}

/// The request for creating a [`PublicKeyCredential`].
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialcreationoptions>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialCreationOptions {
    /// Name and identifier of the Relying Party responsible for the request.
    pub rp: PublicKeyCredentialRpEntity,

    /// Names and an identifier for the user account registering.
    pub user: PublicKeyCredentialUserEntity,

    /// The challenge the authenticator signs, along with other data, when
    /// producing the attestation for the new credential.
    pub challenge: Bytes,

    /// Key types and signature algorithms the Relying Party supports, most
    /// preferred first.
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,

    /// Time in milliseconds the Relying Party is willing to wait for the call
    /// to complete. A hint only; enforcement is up to the client.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "maybe_stringified"
    )]
    pub timeout: Option<u32>,

    /// Credentials already mapped to this account, so the new credential is
    /// not created on an authenticator that holds one of them.
    #[serde(default, deserialize_with = "ignore_unknown_opt_vec")]
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,

    /// Capabilities and settings the authenticator must satisfy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,

    /// Preference regarding attestation conveyance.
    #[serde(default, deserialize_with = "ignore_unknown")]
    pub attestation: AttestationConveyancePreference,
}

/// Additional Relying Party attributes for credential creation.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrpentity>
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublicKeyCredentialRpEntity {
    /// Unique identifier for the Relying Party entity, which sets the RP ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human palatable name of the Relying Party, intended only for display.
    pub name: String,
}

/// Additional user account attributes for credential creation.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialuserentity>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialUserEntity {
    /// The user handle: an opaque byte sequence of at most 64 bytes, not
    /// meant for display. Authentication decisions must be made on this id,
    /// never on the name members, and it must not carry personally
    /// identifying information.
    pub id: Bytes,

    /// Human palatable name for the account, for display only, e.g. the
    /// user's email address.
    pub name: String,

    /// Human palatable display name, to tell apart accounts with similar
    /// `name`s.
    pub display_name: String,
}

/// A single acceptable credential type and signature algorithm.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialparameters>
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PublicKeyCredentialParameters {
    /// The type of credential to be created.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The signature algorithm for the new credential, as a COSE algorithm
    /// identifier. Serialized as its IANA integer value, e.g. `-7` for ES256.
    #[serde(with = "i64_to_iana")]
    pub alg: iana::Algorithm,
}

impl PublicKeyCredentialParameters {
    /// ECDSA w/ SHA-256 over P-256, the single algorithm this Relying Party
    /// core advertises and verifies.
    pub fn es256() -> Self {
        Self {
            ty: PublicKeyCredentialType::PublicKey,
            alg: iana::Algorithm::ES256,
        }
    }
}

/// Requirements regarding authenticator attributes.
///
/// <https://w3c.github.io/webauthn/#dictdef-authenticatorselectioncriteria>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    /// Restrict eligible authenticators to the given attachment modality.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown",
        default
    )]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,

    /// The extent to which a client-side discoverable credential is desired.
    /// The naming retains the deprecated "resident" terminology.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown",
        default
    )]
    pub resident_key: Option<ResidentKeyRequirement>,

    /// Retained for backwards compatibility with WebAuthn Level 1.
    #[serde(default)]
    pub require_resident_key: bool,

    /// The user verification requirement for the `create()` operation.
    #[serde(default, deserialize_with = "ignore_unknown")]
    pub user_verification: UserVerificationRequirement,
}

/// Requirement for client-side discoverable credentials.
///
/// <https://w3c.github.io/webauthn/#enumdef-residentkeyrequirement>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKeyRequirement {
    /// A server-side credential is preferred.
    Discouraged,

    /// A discoverable credential is strongly preferred but not mandated.
    Preferred,

    /// The credential must be client-side discoverable.
    Required,
}

/// Preference regarding attestation conveyance during credential generation.
///
/// <https://w3c.github.io/webauthn/#enumdef-attestationconveyancepreference>
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttestationConveyancePreference {
    /// Not interested in attestation; the statement arrives as the `none`
    /// format. The default, and what this core always requests.
    #[default]
    None,

    /// A verifiable statement is wanted but how it is obtained is up to the
    /// client.
    Indirect,

    /// The statement as generated by the authenticator is wanted.
    Direct,

    /// A statement possibly including uniquely identifying information, for
    /// controlled enterprise deployments.
    Enterprise,
}

/// The authenticator's response to a request to create a credential.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorattestationresponse>
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAttestationResponse {
    /// JSON serialization of the client data passed to the authenticator.
    /// The exact bytes must be preserved since the signed hash was computed
    /// over them.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// The CBOR encoded attestation object carrying the format identifier,
    /// the attestation statement and the authenticator data with the new
    /// credential's public key. Decoded with
    /// [`AttestationObject`](crate::authdata::AttestationObject).
    pub attestation_object: Bytes,
}
