use std::io::{Cursor, Read};

use ciborium::value::Value;
use coset::{AsCborValue, CborSerializable, CoseKey};

use crate::{
    authdata::{Aaguid, Flags},
    crypto::sha256,
    ParseError,
};

/// The contextual bindings made by the authenticator, as a parsed view over
/// the raw `authData` bytes. The layout is fixed-offset up to the signature
/// counter and variable afterwards:
///
/// | field                | offset | length               |
/// |----------------------|--------|----------------------|
/// | rpIdHash             | 0      | 32                   |
/// | flags                | 32     | 1                    |
/// | signCount            | 33     | 4, big-endian        |
/// | attested cred. data  | 37     | present iff AT flag  |
/// | extensions           |        | present iff ED flag  |
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>
#[derive(Debug, PartialEq)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the RP ID the credential is scoped to.
    rp_id_hash: [u8; 32],

    /// The flags of this credential. See [`Flags`].
    pub flags: Flags,

    /// Signature counter, a 32-bit unsigned big-endian integer.
    pub counter: u32,

    /// The attested credential data carrying the new credential's id and
    /// public key. Present exactly when [`Flags::AT`] is set, i.e. on
    /// registration.
    pub attested_credential_data: Option<AttestedCredentialData>,

    /// Extension-defined authenticator data, a CBOR map trailing the rest of
    /// the structure when [`Flags::ED`] is set. Kept as a generic [`Value`]
    /// since `Value` map entries do not round-trip through a `HashMap`.
    pub extensions: Option<Value>,
}

impl AuthenticatorData {
    /// Create a new `AuthenticatorData` for an RP ID with empty flags.
    pub fn new(rp_id: &str, counter: u32) -> Self {
        Self {
            rp_id_hash: sha256(rp_id.as_bytes()),
            flags: Flags::empty(),
            counter,
            attested_credential_data: None,
            extensions: None,
        }
    }

    /// Attach an [`AttestedCredentialData`], setting [`Flags::AT`] as well.
    pub fn set_attested_credential_data(mut self, acd: AttestedCredentialData) -> Self {
        self.attested_credential_data = Some(acd);
        self.set_flags(Flags::AT)
    }

    /// Set additional [`Flags`].
    pub fn set_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    /// Read access to the RP ID hash.
    pub fn rp_id_hash(&self) -> &[u8] {
        &self.rp_id_hash
    }

    /// The attested credential data, or [`ParseError::MissingAttestedCredentialData`]
    /// when the structure came from an assertion rather than a registration.
    pub fn attested_credential_data(&self) -> Result<&AttestedCredentialData, ParseError> {
        self.attested_credential_data
            .as_ref()
            .ok_or(ParseError::MissingAttestedCredentialData)
    }

    /// Decode authenticator data from a byte slice.
    pub fn from_slice(v: &[u8]) -> Result<Self, ParseError> {
        // hash (32 bytes) + flags (1 byte) + counter (4 bytes)
        if v.len() < 37 {
            return Err(ParseError::TruncatedAuthData);
        }

        // SAFETY: split_at panics if the param is greater than the length.
        // These are safe due to the guard above.
        let (rp_id_hash, v) = v.split_at(32);
        let (flag_byte, v) = v.split_at(1);
        let (counter, v) = v.split_at(4);

        let flags = Flags::from(flag_byte[0]);
        let mut reader = Cursor::new(v);
        let attested_credential_data = flags
            .contains(Flags::AT)
            .then(|| AttestedCredentialData::from_reader(&mut reader))
            .transpose()?;
        let extensions = flags
            .contains(Flags::ED)
            .then(|| {
                ciborium::de::from_reader(&mut reader)
                    .map_err(|_| ParseError::MalformedEncoding { offset: None })
            })
            .transpose()?;

        // SAFETY: these unwraps are safe since the variables were created by
        // `split_at` with the matching lengths.
        Ok(AuthenticatorData {
            rp_id_hash: rp_id_hash.try_into().unwrap(),
            flags,
            counter: u32::from_be_bytes(counter.try_into().unwrap()),
            attested_credential_data,
            extensions,
        })
    }

    /// Encode the authenticator data back to its byte representation.
    pub fn to_vec(&self) -> Vec<u8> {
        let flags = if self.attested_credential_data.is_some() {
            self.flags | Flags::AT
        } else {
            self.flags
        };

        self.rp_id_hash
            .into_iter()
            .chain(std::iter::once(flags.into()))
            .chain(self.counter.to_be_bytes())
            .chain(
                self.attested_credential_data
                    .clone()
                    .map(AttestedCredentialData::into_iter)
                    .into_iter()
                    .flatten(),
            )
            .chain(
                self.extensions
                    .as_ref()
                    .map(|val| {
                        let mut bytes = Vec::new();
                        // SAFETY: serializing an in-memory `Value` into a Vec
                        // cannot fail unless out of memory.
                        ciborium::ser::into_writer(val, &mut bytes).unwrap();
                        bytes
                    })
                    .into_iter()
                    .flatten(),
            )
            .collect()
    }
}

/// The variable-length credential attestation appended to the authenticator
/// data when a credential is created: AAGUID, length-prefixed credential id
/// and the credential public key in COSE_Key format.
///
/// <https://w3c.github.io/webauthn/#attested-credential-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredentialData {
    /// The AAGUID of the authenticator.
    pub aaguid: Aaguid,

    /// The credential ID, whose length is prepended on the wire. Not public
    /// so it cannot be grown past what a u16 can express.
    credential_id: Vec<u8>,

    /// The credential public key in COSE_Key format, CTAP2 canonical CBOR
    /// encoding.
    pub key: CoseKey,
}

impl AttestedCredentialData {
    /// Create a new [`AttestedCredentialData`].
    ///
    /// # Error
    /// Returns the value back if the length of `credential_id` cannot be
    /// represented by a u16.
    pub fn new(aaguid: Aaguid, credential_id: Vec<u8>, key: CoseKey) -> Result<Self, Vec<u8>> {
        if u16::try_from(credential_id.len()).is_err() {
            return Err(credential_id);
        }

        Ok(Self {
            aaguid,
            credential_id,
            key,
        })
    }

    /// Read access to the credential ID.
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Custom implementation rather than `IntoIterator` because the iterator
    /// type is complicated.
    fn into_iter(self) -> impl Iterator<Item = u8> {
        // SAFETY: serializing an in-memory COSE key cannot fail unless out
        // of memory.
        let cose_key = self.key.to_vec().unwrap();
        self.aaguid
            .0
            .into_iter()
            // SAFETY: the length was asserted to fit a u16 in the constructor.
            .chain(
                u16::try_from(self.credential_id.len())
                    .unwrap()
                    .to_be_bytes(),
            )
            .chain(self.credential_id)
            .chain(cose_key)
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ParseError> {
        let mut aaguid = [0; Aaguid::LEN];
        reader
            .read_exact(&mut aaguid)
            .map_err(|_| ParseError::TruncatedAuthData)?;
        let aaguid = Aaguid(aaguid);

        // The credential id length is a full big-endian u16: both bytes
        // count, not just the low one.
        let mut cred_len = [0; 2];
        reader
            .read_exact(&mut cred_len)
            .map_err(|_| ParseError::TruncatedAuthData)?;
        let cred_len = usize::from(u16::from_be_bytes(cred_len));

        let mut credential_id = vec![0; cred_len];
        reader
            .read_exact(&mut credential_id)
            .map_err(|_| ParseError::TruncatedAuthData)?;

        let cose_val = ciborium::de::from_reader(reader)
            .map_err(|_| ParseError::MalformedEncoding { offset: None })?;
        let key = CoseKey::from_cbor_value(cose_val).map_err(|_| ParseError::UnexpectedShape {
            expected: "a COSE key",
        })?;

        Ok(Self {
            aaguid,
            credential_id,
            key,
        })
    }
}
