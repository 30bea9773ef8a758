//! # WebAuthn Relying Party
//!
//! The relying-party side of a passkey ceremony: building registration and
//! authentication requests, decoding what the platform credential broker
//! hands back, reconstructing the credential's public key and verifying
//! assertion signatures.
//!
//! The crypto core ([`cose`] and [`verify`]) is synchronous and side-effect
//! free; the only suspension point lives in the [`CredentialBroker`]
//! collaborator, which this crate treats as an opaque call returning a signed
//! JSON envelope. Storage is likewise behind the [`CredentialStore`] trait,
//! so the [`Ceremony`] orchestrator owns no hidden state and every
//! collaborator is injected at construction.
//!
//! This crate performs no networking and installs no logger; it logs through
//! the [`log`] facade.

mod broker;
mod ceremony;
mod error;
mod request;
mod store;

pub mod cose;
pub mod verify;

#[cfg(test)]
mod tests;

pub use broker::{BrokerError, CredentialBroker};
pub use ceremony::{AssertionOutcome, Ceremony, CeremonyState};
pub use error::{CeremonyError, ClientDataError, KeyError, SignatureError};
pub use request::{RequestBuilder, TIMEOUT_MS};
pub use store::{CredentialRecord, CredentialStore, MemoryStore};
