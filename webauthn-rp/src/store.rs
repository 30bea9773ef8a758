//! Credential persistence seam and an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use webauthn_rp_types::Bytes;

/// The persisted view of a registered credential.
///
/// The public key is stored in X.509 `SubjectPublicKeyInfo` DER form, the
/// output of [`cose::public_key_der_from_cose_key`], so re-deriving a
/// verifying key at assertion time needs no COSE decoding.
///
/// [`cose::public_key_der_from_cose_key`]: crate::cose::public_key_der_from_cose_key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// The credential id as the base64url string the platform reported.
    pub credential_id: String,

    /// The opaque user handle the credential was registered under.
    pub user_handle: Bytes,

    /// The account the credential was registered for.
    pub email: String,

    /// DER encoded public key.
    pub public_key: Bytes,

    /// Unix timestamp of registration, in seconds.
    pub created_at: u64,
}

/// Storage for registered credentials, keyed by credential id.
#[async_trait]
pub trait CredentialStore {
    /// Look up a credential by id.
    async fn get(&self, credential_id: &str) -> Option<CredentialRecord>;

    /// Persist a credential, replacing any record under the same id.
    async fn put(&self, record: CredentialRecord);
}

#[async_trait]
impl<S: CredentialStore + Send + Sync> CredentialStore for Arc<S> {
    async fn get(&self, credential_id: &str) -> Option<CredentialRecord> {
        (**self).get(credential_id).await
    }

    async fn put(&self, record: CredentialRecord) {
        (**self).put(record).await
    }
}

/// A [`CredentialStore`] backed by a hash map, for tests and prototyping.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        // SAFETY: the lock is never held across an await and no holder
        // panics, so it cannot be poisoned.
        self.records.lock().unwrap().len()
    }

    /// Whether the store holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, credential_id: &str) -> Option<CredentialRecord> {
        // SAFETY: see `len`.
        self.records.lock().unwrap().get(credential_id).cloned()
    }

    async fn put(&self, record: CredentialRecord) {
        // SAFETY: see `len`.
        self.records
            .lock()
            .unwrap()
            .insert(record.credential_id.clone(), record);
    }
}
