//! Orchestration of the two ceremonies.
//!
//! The [`Ceremony`] is a thin state machine over three injected
//! collaborators: the [`RequestBuilder`] policy, a [`CredentialBroker`] and a
//! [`CredentialStore`]. It never reports success unless the broker call
//! succeeded, the echoed client data matches the ceremony and its challenge,
//! and, for authentication, the signature verified against a stored key. A
//! failure on any step leaves the store untouched.

use std::time::{SystemTime, UNIX_EPOCH};

use webauthn_rp_types::{
    authdata::AttestationObject,
    webauthn::{
        AuthenticatedPublicKeyCredential, ClientDataType, CollectedClientData,
        CreatedPublicKeyCredential,
    },
    Bytes, Challenge, ParseError,
};

use crate::{
    broker::{BrokerError, CredentialBroker},
    cose,
    error::ClientDataError,
    request::RequestBuilder,
    store::{CredentialRecord, CredentialStore},
    verify, CeremonyError,
};

/// Where a ceremony currently stands. Refreshed at the start of each
/// `register`/`authenticate` call; terminal states persist until the next
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CeremonyState {
    /// No ceremony has run yet.
    #[default]
    Idle,

    /// The request was handed to the broker.
    AwaitingBrokerResponse,

    /// The broker envelope arrived and the credential key is being resolved.
    ParsingKey,

    /// The assertion signature is being checked.
    Verifying,

    /// The ceremony completed and, for authentication, the signature
    /// verified.
    Success,

    /// No stored credential could answer, or the signature did not verify.
    NoCredential,

    /// The ceremony failed hard; the returned [`CeremonyError`] says why.
    Error,
}

/// The result of a completed authentication ceremony.
///
/// "No usable credential" is an expected outcome of an authentication
/// prompt, not an error, so it is a variant callers must match on.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionOutcome {
    /// The assertion verified against this stored credential.
    Accepted(CredentialRecord),

    /// The broker had no credential, the asserted credential is not in the
    /// store, or the signature did not verify.
    NoCredential,
}

/// Runs registration and authentication ceremonies for one Relying Party.
pub struct Ceremony<B, S> {
    requests: RequestBuilder,
    broker: B,
    store: S,
    state: CeremonyState,
}

impl<B, S> Ceremony<B, S>
where
    B: CredentialBroker,
    S: CredentialStore,
{
    /// A ceremony over the given policy, broker and store.
    pub fn new(requests: RequestBuilder, broker: B, store: S) -> Self {
        Self {
            requests,
            broker,
            store,
            state: CeremonyState::Idle,
        }
    }

    /// The state the most recent ceremony reached.
    pub fn state(&self) -> CeremonyState {
        self.state
    }

    /// Register a new credential for the given account and persist it.
    ///
    /// The record is only written once the broker response parsed and the
    /// credential's public key resolved; any earlier failure leaves the
    /// store untouched.
    pub async fn register(
        &mut self,
        user_id: impl Into<Bytes>,
        email: impl Into<String>,
    ) -> Result<CredentialRecord, CeremonyError> {
        let email = email.into();
        let result = self.run_register(user_id.into(), email).await;
        self.state = match &result {
            Ok(_) => CeremonyState::Success,
            Err(_) => CeremonyState::Error,
        };
        result
    }

    async fn run_register(
        &mut self,
        user_id: Bytes,
        email: String,
    ) -> Result<CredentialRecord, CeremonyError> {
        let challenge = Challenge::random();
        let options = self
            .requests
            .registration(user_id.clone(), email.clone(), &challenge);

        self.state = CeremonyState::AwaitingBrokerResponse;
        let envelope = self.broker.create_credential(&options).await?;

        self.state = CeremonyState::ParsingKey;
        let credential: CreatedPublicKeyCredential = serde_json::from_str(&envelope)
            .map_err(|_| ParseError::MalformedEncoding { offset: None })?;
        check_client_data(
            &credential.response.client_data_json,
            ClientDataType::Create,
            &challenge,
        )?;
        let attestation = AttestationObject::from_slice(&credential.response.attestation_object)?;
        let attested = attestation.auth_data.attested_credential_data()?;
        let public_key = cose::public_key_der_from_cose_key(&attested.key)?;

        let record = CredentialRecord {
            credential_id: credential.id,
            user_handle: user_id,
            email,
            public_key,
            created_at: unix_now(),
        };
        log::debug!("registered credential {}", record.credential_id);
        self.store.put(record.clone()).await;
        Ok(record)
    }

    /// Run an authentication ceremony against the given allow list.
    ///
    /// An empty allow list asks for any discoverable credential scoped to
    /// the RP ID. The broker reporting no credential, an asserted credential
    /// id missing from the store, and a signature that does not verify are
    /// all the [`AssertionOutcome::NoCredential`] outcome; everything else
    /// that goes wrong is a hard error.
    pub async fn authenticate(
        &mut self,
        allow: &[Bytes],
    ) -> Result<AssertionOutcome, CeremonyError> {
        let result = self.run_authenticate(allow).await;
        self.state = match &result {
            Ok(AssertionOutcome::Accepted(_)) => CeremonyState::Success,
            Ok(AssertionOutcome::NoCredential) => CeremonyState::NoCredential,
            Err(_) => CeremonyState::Error,
        };
        result
    }

    async fn run_authenticate(
        &mut self,
        allow: &[Bytes],
    ) -> Result<AssertionOutcome, CeremonyError> {
        let challenge = Challenge::random();
        let options = self.requests.assertion(allow, &challenge);

        self.state = CeremonyState::AwaitingBrokerResponse;
        let envelope = match self.broker.get_credential(&options).await {
            Ok(envelope) => envelope,
            Err(BrokerError::NoCredential) => {
                log::debug!("broker reported no usable credential");
                return Ok(AssertionOutcome::NoCredential);
            }
            Err(err) => return Err(err.into()),
        };

        self.state = CeremonyState::ParsingKey;
        let credential: AuthenticatedPublicKeyCredential = serde_json::from_str(&envelope)
            .map_err(|_| ParseError::MalformedEncoding { offset: None })?;
        check_client_data(
            &credential.response.client_data_json,
            ClientDataType::Get,
            &challenge,
        )?;
        let Some(record) = self.store.get(&credential.id).await else {
            log::warn!("asserted credential {} is not in the store", credential.id);
            return Ok(AssertionOutcome::NoCredential);
        };
        let key = cose::verifying_key_from_der(&record.public_key)?;

        self.state = CeremonyState::Verifying;
        if verify::verify_assertion(&credential.response, &key)? {
            Ok(AssertionOutcome::Accepted(record))
        } else {
            log::warn!(
                "assertion signature for credential {} did not verify",
                credential.id
            );
            Ok(AssertionOutcome::NoCredential)
        }
    }
}

/// Check that the echoed client data belongs to this ceremony: the right
/// ceremony type and the challenge this ceremony issued.
fn check_client_data(
    bytes: &[u8],
    expected: ClientDataType,
    challenge: &Challenge,
) -> Result<(), CeremonyError> {
    let client_data: CollectedClientData = serde_json::from_slice(bytes)
        .map_err(|_| ParseError::MalformedEncoding { offset: None })?;
    if client_data.ty != expected {
        return Err(ClientDataError::UnexpectedType.into());
    }
    if client_data.challenge != challenge.to_string() {
        return Err(ClientDataError::ChallengeMismatch.into());
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
