//! The binary structures an authenticator returns during registration: the
//! attestation object and the authenticator data embedded in it.

mod aaguid;
mod attestation_object;
mod authenticator_data;
mod flags;

pub use self::{
    aaguid::Aaguid,
    attestation_object::AttestationObject,
    authenticator_data::{AttestedCredentialData, AuthenticatorData},
    flags::Flags,
};
