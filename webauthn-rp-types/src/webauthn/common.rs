//! Types shared between the registration and authentication ceremonies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    utils::serde::{ignore_unknown, ignore_unknown_opt_vec},
    Bytes,
};

/// The valid credential types. An extension point in the webauthn spec; only
/// `public-key` is defined today and unknown values must be ignored rather
/// than fail deserialization.
///
/// <https://w3c.github.io/webauthn/#enumdef-publickeycredentialtype>
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PublicKeyCredentialType {
    /// The public counterpart of an asymmetric key pair.
    PublicKey,
    /// Fallback for values unknown at deserialization.
    #[default]
    Unknown,
}

/// Identifies a specific credential in an exclusion list (registration) or an
/// allow list (authentication).
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialdescriptor>
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublicKeyCredentialDescriptor {
    /// The type of the credential being referred to. Descriptors whose type
    /// is [`PublicKeyCredentialType::Unknown`] should be skipped.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The credential ID of the credential being referred to.
    pub id: Bytes,

    /// Hints on how the client might communicate with the managing
    /// authenticator. Unknown values are ignored.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown_opt_vec"
    )]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

impl PublicKeyCredentialDescriptor {
    /// Whether [`Self::ty`] holds a known credential type.
    pub fn is_known(&self) -> bool {
        match self.ty {
            PublicKeyCredentialType::PublicKey => true,
            PublicKeyCredentialType::Unknown => false,
        }
    }
}

/// A Relying Party's requirement on [user verification] for an operation.
///
/// <https://w3c.github.io/webauthn/#enumdef-userverificationrequirement>
///
/// [user verification]: https://w3c.github.io/webauthn/#user-verification
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationRequirement {
    /// The ceremony fails unless the response carries the UV flag.
    Required,

    /// Verification is preferred but its absence does not fail the ceremony.
    #[default]
    Preferred,

    /// User verification should not be employed.
    Discouraged,
}

/// Transports over which an authenticator may be reachable.
///
/// <https://w3c.github.io/webauthn/#enum-transport>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorTransport {
    /// Removable USB.
    Usb,

    /// Near Field Communication.
    Nfc,

    /// Bluetooth Low Energy.
    Ble,

    /// Combination of data-transport and proximity mechanisms, e.g. signing
    /// on a desktop with a nearby smartphone.
    #[serde(alias = "cable")]
    Hybrid,

    /// A client device-specific transport; the authenticator is a platform
    /// authenticator and not removable from the device.
    Internal,
}

/// Authenticator attachment modalities. A Relying Party states its preference
/// at registration; this core pins `platform` (see the request builder).
///
/// <https://w3c.github.io/webauthn/#enumdef-authenticatorattachment>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorAttachment {
    /// Attached using a client device-specific transport and usually not
    /// removable from the device.
    Platform,

    /// Removable and able to roam between client devices.
    CrossPlatform,
}

/// The contextual bindings collected by the client and echoed back, hashed,
/// under every signature. The exact JSON byte serialization must be preserved
/// by anyone re-serializing this, which is why unknown keys keep their order
/// in an [`IndexMap`].
///
/// <https://w3c.github.io/webauthn/#dictionary-client-data>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    /// [`ClientDataType::Create`] for registration, [`ClientDataType::Get`]
    /// for authentication. Prevents signature confusion between ceremonies.
    #[serde(rename = "type")]
    pub ty: ClientDataType,

    /// base64url encoding of the challenge the Relying Party issued.
    pub challenge: String,

    /// Fully qualified origin of the requester, as determined by the client.
    pub origin: String,

    /// Whether the request came from an embedding context of another origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<bool>,

    /// Keys this library does not know about, preserved in order for
    /// re-serialization.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, serde_json::value::Value>,
}

/// The ceremony a [`CollectedClientData`] belongs to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ClientDataType {
    /// Serializes to the string `"webauthn.create"`
    #[serde(rename = "webauthn.create")]
    Create,

    /// Serializes to the string `"webauthn.get"`
    #[serde(rename = "webauthn.get")]
    Get,
}
