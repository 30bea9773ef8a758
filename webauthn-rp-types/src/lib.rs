//! # WebAuthn Relying-Party Types
//!
//! Wire-format and binary-structure definitions used by a Relying Party when
//! driving a passkey ceremony: request option types, response envelopes, the
//! CBOR decoding layer and the authenticator data structures returned on
//! registration.
//!
//! The types in this crate are deliberately free of any I/O; they only model
//! what travels between the Relying Party, the platform credential broker and
//! the authenticator.

mod utils;

pub mod authdata;
pub mod cbor;
pub mod webauthn;

mod challenge;
mod error;

// Re-exports
pub use challenge::Challenge;
pub use error::ParseError;
pub use utils::{
    bytes::{Bytes, NotBase64Encoded},
    crypto, encoding, rand,
};
