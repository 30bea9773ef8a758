//! End to end ceremony tests against a software authenticator.
//!
//! The broker seam is filled by [`SoftAuthenticator`], which holds a real
//! P-256 key and fabricates the same JSON envelopes a platform broker
//! produces, so the full decode, key resolution and verification path runs.

use std::sync::Arc;

use async_trait::async_trait;
use ciborium::{cbor, value::Value};
use coset::{iana, CoseKey, CoseKeyBuilder};
use p256::{
    ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey},
    pkcs8::EncodePublicKey,
};
use serde_json::json;
use webauthn_rp_types::{
    authdata::{Aaguid, AttestedCredentialData, AuthenticatorData, Flags},
    crypto::sha256,
    encoding::base64url,
    rand::random_vec,
    webauthn::{
        AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
        CredentialCreationOptions, CredentialRequestOptions, PublicKeyCredential,
        PublicKeyCredentialType,
    },
    Bytes, ParseError,
};

use crate::{
    cose, AssertionOutcome, BrokerError, Ceremony, CeremonyError, CeremonyState, ClientDataError,
    CredentialBroker, CredentialRecord, CredentialStore, MemoryStore, RequestBuilder,
};

const RP_ID: &str = "relying.example.com";
const ORIGIN: &str = "https://relying.example.com";

fn requests() -> RequestBuilder {
    RequestBuilder::new(RP_ID, "Example Corp")
}

/// A broker backed by an in-process P-256 key.
struct SoftAuthenticator {
    key: SigningKey,
    credential_id: Vec<u8>,
    /// When set, echoed in the client data instead of the issued challenge.
    stale_challenge: Option<Bytes>,
    /// When set, used as the client data `type` for both ceremonies.
    client_data_type: Option<&'static str>,
}

impl SoftAuthenticator {
    fn new() -> Self {
        Self {
            key: SigningKey::random(&mut rand::thread_rng()),
            credential_id: random_vec(16),
            stale_challenge: None,
            client_data_type: None,
        }
    }

    fn echoing_challenge(challenge: impl Into<Bytes>) -> Self {
        Self {
            stale_challenge: Some(challenge.into()),
            ..Self::new()
        }
    }

    fn claiming_type(ty: &'static str) -> Self {
        Self {
            client_data_type: Some(ty),
            ..Self::new()
        }
    }

    fn verifying_key(&self) -> VerifyingKey {
        *self.key.verifying_key()
    }

    fn cose_key(&self) -> CoseKey {
        let point = self.verifying_key().to_encoded_point(false);
        // SAFETY: the point is uncompressed so both coordinates are present.
        CoseKeyBuilder::new_ec2_pub_key(
            iana::EllipticCurve::P_256,
            point.x().unwrap().as_slice().to_vec(),
            point.y().unwrap().as_slice().to_vec(),
        )
        .algorithm(iana::Algorithm::ES256)
        .build()
    }

    fn client_data(&self, ty: &'static str, challenge: &Bytes) -> Vec<u8> {
        let challenge = self.stale_challenge.as_ref().unwrap_or(challenge);
        json!({
            "type": self.client_data_type.unwrap_or(ty),
            "challenge": base64url(challenge),
            "origin": ORIGIN,
        })
        .to_string()
        .into_bytes()
    }
}

#[async_trait]
impl CredentialBroker for SoftAuthenticator {
    async fn create_credential(
        &self,
        options: &CredentialCreationOptions,
    ) -> Result<String, BrokerError> {
        let client_data_json = self.client_data("webauthn.create", &options.public_key.challenge);
        let auth_data = AuthenticatorData::new(RP_ID, 0)
            .set_flags(Flags::UP | Flags::UV)
            .set_attested_credential_data(
                AttestedCredentialData::new(
                    Aaguid::new_empty(),
                    self.credential_id.clone(),
                    self.cose_key(),
                )
                .expect("credential id fits a u16"),
            )
            .to_vec();

        let mut attestation_object = Vec::new();
        ciborium::ser::into_writer(
            &cbor!({
                "fmt" => "none",
                "attStmt" => {},
                "authData" => Value::Bytes(auth_data),
            })
            .expect("failed to build attestation object"),
            &mut attestation_object,
        )
        .expect("failed to serialize attestation object");

        let credential = PublicKeyCredential {
            id: base64url(&self.credential_id),
            raw_id: self.credential_id.clone().into(),
            ty: PublicKeyCredentialType::PublicKey,
            response: AuthenticatorAttestationResponse {
                client_data_json: client_data_json.into(),
                attestation_object: attestation_object.into(),
            },
        };
        Ok(serde_json::to_string(&credential).expect("failed to serialize envelope"))
    }

    async fn get_credential(
        &self,
        options: &CredentialRequestOptions,
    ) -> Result<String, BrokerError> {
        let client_data_json = self.client_data("webauthn.get", &options.public_key.challenge);
        let authenticator_data = AuthenticatorData::new(RP_ID, 1)
            .set_flags(Flags::UP | Flags::UV)
            .to_vec();

        let mut signature_base = authenticator_data.clone();
        signature_base.extend_from_slice(&sha256(&client_data_json));
        let signature: Signature = self.key.sign(&signature_base);

        let credential = PublicKeyCredential {
            id: base64url(&self.credential_id),
            raw_id: self.credential_id.clone().into(),
            ty: PublicKeyCredentialType::PublicKey,
            response: AuthenticatorAssertionResponse {
                client_data_json: client_data_json.into(),
                authenticator_data: authenticator_data.into(),
                signature: signature.to_der().as_bytes().to_vec().into(),
                user_handle: None,
            },
        };
        Ok(serde_json::to_string(&credential).expect("failed to serialize envelope"))
    }
}

/// A broker whose every call fails the same way.
struct FailingBroker(BrokerError);

#[async_trait]
impl CredentialBroker for FailingBroker {
    async fn create_credential(
        &self,
        _options: &CredentialCreationOptions,
    ) -> Result<String, BrokerError> {
        Err(self.0.clone())
    }

    async fn get_credential(
        &self,
        _options: &CredentialRequestOptions,
    ) -> Result<String, BrokerError> {
        Err(self.0.clone())
    }
}

/// A broker that answers with something that is not a credential envelope.
struct GarbageBroker;

#[async_trait]
impl CredentialBroker for GarbageBroker {
    async fn create_credential(
        &self,
        _options: &CredentialCreationOptions,
    ) -> Result<String, BrokerError> {
        Ok("not an envelope".into())
    }

    async fn get_credential(
        &self,
        _options: &CredentialRequestOptions,
    ) -> Result<String, BrokerError> {
        Ok("{\"almost\": []".into())
    }
}

#[tokio::test]
async fn register_then_authenticate_round_trip() {
    let authenticator = SoftAuthenticator::new();
    let credential_id = authenticator.credential_id.clone();
    let mut ceremony = Ceremony::new(requests(), authenticator, MemoryStore::new());

    let record = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .expect("registration failed");
    assert_eq!(ceremony.state(), CeremonyState::Success);
    assert_eq!(record.credential_id, base64url(&credential_id));
    assert_eq!(record.user_handle, Bytes::from(b"user-1".to_vec()));
    assert_eq!(record.email, "jane@example.com");

    let outcome = ceremony
        .authenticate(&[credential_id.into()])
        .await
        .expect("authentication failed");
    assert_eq!(ceremony.state(), CeremonyState::Success);
    assert_eq!(outcome, AssertionOutcome::Accepted(record));
}

#[tokio::test]
async fn registration_persists_the_resolved_key() {
    let authenticator = SoftAuthenticator::new();
    let expected_key = authenticator.verifying_key();
    let store = Arc::new(MemoryStore::new());
    let mut ceremony = Ceremony::new(requests(), authenticator, Arc::clone(&store));

    let record = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .expect("registration failed");

    assert_eq!(store.len(), 1);
    let stored = store.get(&record.credential_id).await.expect("not stored");
    assert_eq!(stored, record);
    let resolved = cose::verifying_key_from_der(&stored.public_key).expect("bad stored key");
    assert_eq!(resolved, expected_key);
}

#[tokio::test]
async fn unknown_credential_is_not_accepted() {
    let mut ceremony = Ceremony::new(requests(), SoftAuthenticator::new(), MemoryStore::new());

    let outcome = ceremony.authenticate(&[]).await.expect("hard failure");
    assert_eq!(outcome, AssertionOutcome::NoCredential);
    assert_eq!(ceremony.state(), CeremonyState::NoCredential);
}

#[tokio::test]
async fn assertion_against_a_different_stored_key_is_not_accepted() {
    let authenticator = SoftAuthenticator::new();
    let credential_id = authenticator.credential_id.clone();
    let store = MemoryStore::new();

    let other_key = SigningKey::random(&mut rand::thread_rng());
    let other_der = other_key
        .verifying_key()
        .to_public_key_der()
        .expect("failed to encode key")
        .as_ref()
        .to_vec();
    store
        .put(CredentialRecord {
            credential_id: base64url(&credential_id),
            user_handle: b"user-1".to_vec().into(),
            email: "jane@example.com".into(),
            public_key: other_der.into(),
            created_at: 0,
        })
        .await;

    let mut ceremony = Ceremony::new(requests(), authenticator, store);
    let outcome = ceremony
        .authenticate(&[credential_id.into()])
        .await
        .expect("hard failure");
    assert_eq!(outcome, AssertionOutcome::NoCredential);
    assert_eq!(ceremony.state(), CeremonyState::NoCredential);
}

#[tokio::test]
async fn broker_without_a_credential_is_a_soft_outcome() {
    let mut ceremony = Ceremony::new(
        requests(),
        FailingBroker(BrokerError::NoCredential),
        MemoryStore::new(),
    );

    let outcome = ceremony.authenticate(&[]).await.expect("hard failure");
    assert_eq!(outcome, AssertionOutcome::NoCredential);
    assert_eq!(ceremony.state(), CeremonyState::NoCredential);
}

#[tokio::test]
async fn broker_without_a_credential_fails_registration() {
    let mut ceremony = Ceremony::new(
        requests(),
        FailingBroker(BrokerError::NoCredential),
        MemoryStore::new(),
    );

    let err = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .unwrap_err();
    assert_eq!(err, CeremonyError::Broker(BrokerError::NoCredential));
    assert_eq!(ceremony.state(), CeremonyState::Error);
}

#[tokio::test]
async fn cancellation_is_a_hard_error() {
    let mut ceremony = Ceremony::new(
        requests(),
        FailingBroker(BrokerError::Cancelled),
        MemoryStore::new(),
    );

    let err = ceremony.authenticate(&[]).await.unwrap_err();
    assert_eq!(err, CeremonyError::Broker(BrokerError::Cancelled));
    assert_eq!(ceremony.state(), CeremonyState::Error);
}

#[tokio::test]
async fn broker_outage_is_a_hard_error() {
    let mut ceremony = Ceremony::new(
        requests(),
        FailingBroker(BrokerError::Unavailable),
        MemoryStore::new(),
    );

    let err = ceremony.authenticate(&[]).await.unwrap_err();
    assert_eq!(err, CeremonyError::Broker(BrokerError::Unavailable));
    assert_eq!(ceremony.state(), CeremonyState::Error);
}

#[tokio::test]
async fn platform_failure_is_a_hard_error() {
    let mut ceremony = Ceremony::new(
        requests(),
        FailingBroker(BrokerError::Platform("provider crashed".into())),
        MemoryStore::new(),
    );

    let err = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CeremonyError::Broker(BrokerError::Platform("provider crashed".into()))
    );
    assert_eq!(ceremony.state(), CeremonyState::Error);
}

#[tokio::test]
async fn echoed_stale_challenge_is_rejected() {
    let authenticator = SoftAuthenticator::echoing_challenge(random_vec(32));
    let credential_id = authenticator.credential_id.clone();
    let store = Arc::new(MemoryStore::new());
    let mut ceremony = Ceremony::new(requests(), authenticator, Arc::clone(&store));

    let err = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CeremonyError::ClientData(ClientDataError::ChallengeMismatch)
    );
    assert_eq!(ceremony.state(), CeremonyState::Error);
    assert!(store.is_empty());

    let err = ceremony
        .authenticate(&[credential_id.into()])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CeremonyError::ClientData(ClientDataError::ChallengeMismatch)
    );
    assert_eq!(ceremony.state(), CeremonyState::Error);
}

#[tokio::test]
async fn client_data_for_the_other_ceremony_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let mut ceremony = Ceremony::new(
        requests(),
        SoftAuthenticator::claiming_type("webauthn.get"),
        Arc::clone(&store),
    );

    let err = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .unwrap_err();
    assert_eq!(err, CeremonyError::ClientData(ClientDataError::UnexpectedType));
    assert_eq!(ceremony.state(), CeremonyState::Error);
    assert!(store.is_empty());
}

#[tokio::test]
async fn malformed_envelopes_are_parse_errors_and_store_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut ceremony = Ceremony::new(requests(), GarbageBroker, Arc::clone(&store));

    let err = ceremony
        .register(b"user-1".to_vec(), "jane@example.com")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CeremonyError::Parse(ParseError::MalformedEncoding { offset: None })
    );
    assert_eq!(ceremony.state(), CeremonyState::Error);
    assert!(store.is_empty());

    let err = ceremony.authenticate(&[]).await.unwrap_err();
    assert_eq!(
        err,
        CeremonyError::Parse(ParseError::MalformedEncoding { offset: None })
    );
    assert_eq!(ceremony.state(), CeremonyState::Error);
}
