//! Resolution of a decoded COSE key map into a P-256 verifying key.
//!
//! Only the EC2 key type on P-256 with ES256 is supported, matching the
//! single algorithm advertised at registration. The x and y coordinates live
//! at the negative integer labels `-2` and `-3` of the COSE map and are
//! interpreted as unsigned big-endian integers forming an affine point.

use coset::{
    iana::{self, EnumI64},
    CoseKey,
};
use p256::{
    ecdsa::VerifyingKey,
    elliptic_curve::{generic_array::GenericArray, sec1::FromEncodedPoint},
    pkcs8::{DecodePublicKey, EncodePublicKey},
    EncodedPoint, PublicKey,
};
use webauthn_rp_types::Bytes;

use crate::KeyError;

const COORDINATE_LEN: usize = 32;

fn ec2_p256_point(key: &CoseKey) -> Result<PublicKey, KeyError> {
    if !matches!(
        key.alg,
        Some(coset::RegisteredLabelWithPrivate::Assigned(
            iana::Algorithm::ES256
        ))
    ) {
        return Err(KeyError::UnsupportedKeyType);
    }
    if !matches!(
        key.kty,
        coset::RegisteredLabel::Assigned(iana::KeyType::EC2)
    ) {
        return Err(KeyError::UnsupportedKeyType);
    }

    let (mut crv, mut x, mut y) = (None, None, None);
    for (label, value) in &key.params {
        let coset::Label::Int(i) = label else {
            continue;
        };
        match iana::Ec2KeyParameter::from_i64(*i) {
            Some(iana::Ec2KeyParameter::Crv) => {
                crv = value.as_integer();
            }
            Some(iana::Ec2KeyParameter::X) => {
                if value.as_bytes().and_then(|v| x.replace(v)).is_some() {
                    log::warn!("COSE key has multiple entries for the x coordinate");
                }
            }
            Some(iana::Ec2KeyParameter::Y) => {
                if value.as_bytes().and_then(|v| y.replace(v)).is_some() {
                    log::warn!("COSE key has multiple entries for the y coordinate");
                }
            }
            _ => (),
        }
    }

    if crv != Some(iana::EllipticCurve::P_256.to_i64().into()) {
        return Err(KeyError::UnsupportedKeyType);
    }
    let (Some(x), Some(y)) = (x, y) else {
        return Err(KeyError::InvalidCoordinate);
    };
    if x.len() != COORDINATE_LEN || y.len() != COORDINATE_LEN {
        return Err(KeyError::InvalidCoordinate);
    }

    let point = EncodedPoint::from_affine_coordinates(
        GenericArray::from_slice(x.as_slice()),
        GenericArray::from_slice(y.as_slice()),
        false,
    );
    Option::<PublicKey>::from(PublicKey::from_encoded_point(&point))
        .ok_or(KeyError::InvalidCoordinate)
}

/// Resolve a COSE EC2 key into a key usable for ECDSA verification.
pub fn verifying_key_from_cose_key(key: &CoseKey) -> Result<VerifyingKey, KeyError> {
    ec2_p256_point(key).map(|public_key| VerifyingKey::from(&public_key))
}

/// Resolve a COSE EC2 key into the X.509 `SubjectPublicKeyInfo` DER bytes
/// used as the persisted form of a credential's public key.
pub fn public_key_der_from_cose_key(key: &CoseKey) -> Result<Bytes, KeyError> {
    let public_key = ec2_p256_point(key)?;
    public_key
        .to_public_key_der()
        .map_err(|_| KeyError::InvalidCoordinate)
        .map(|der| der.as_ref().to_vec().into())
}

/// Decode a persisted DER public key back into a verifying key.
pub fn verifying_key_from_der(der: &[u8]) -> Result<VerifyingKey, KeyError> {
    VerifyingKey::from_public_key_der(der).map_err(|_| KeyError::MalformedDer)
}
