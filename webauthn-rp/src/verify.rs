//! Assertion signature verification.
//!
//! The authenticator signs `authenticatorData || SHA-256(clientDataJSON)`,
//! raw bytes concatenated with the hash in that order and no separators. This
//! module recomputes that signature base and checks the ECDSA signature over
//! it. It is pure: callable without any network or storage collaborator,
//! which is what makes the ceremony deterministic to test.

use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use webauthn_rp_types::{crypto::sha256, webauthn::AuthenticatorAssertionResponse};

use crate::SignatureError;

/// Verify an assertion against a credential's public key.
///
/// A signature that does not match is `Ok(false)`, not an error: only
/// signature bytes that are not valid DER fail with
/// [`SignatureError::InvalidSignatureEncoding`].
pub fn verify_assertion(
    assertion: &AuthenticatorAssertionResponse,
    public_key: &VerifyingKey,
) -> Result<bool, SignatureError> {
    let signature = Signature::from_der(&assertion.signature)
        .map_err(|_| SignatureError::InvalidSignatureEncoding)?;

    let client_data_hash = sha256(&assertion.client_data_json);
    let mut signature_base =
        Vec::with_capacity(assertion.authenticator_data.len() + client_data_hash.len());
    signature_base.extend_from_slice(&assertion.authenticator_data);
    signature_base.extend_from_slice(&client_data_hash);

    Ok(public_key.verify(&signature_base, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use p256::ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey};
    use webauthn_rp_types::{
        authdata::{AuthenticatorData, Flags},
        crypto::sha256,
        webauthn::AuthenticatorAssertionResponse,
    };

    use super::*;

    fn signed_assertion(key: &SigningKey) -> AuthenticatorAssertionResponse {
        let client_data_json =
            br#"{"type":"webauthn.get","challenge":"dGVzdA","origin":"https://relying.example.com"}"#
                .to_vec();
        let authenticator_data = AuthenticatorData::new("relying.example.com", 12)
            .set_flags(Flags::UP | Flags::UV)
            .to_vec();

        let mut signature_base = authenticator_data.clone();
        signature_base.extend_from_slice(&sha256(&client_data_json));
        let signature: Signature = key.sign(&signature_base);

        AuthenticatorAssertionResponse {
            client_data_json: client_data_json.into(),
            authenticator_data: authenticator_data.into(),
            signature: signature.to_der().as_bytes().to_vec().into(),
            user_handle: None,
        }
    }

    fn keypair() -> (SigningKey, VerifyingKey) {
        let signing = SigningKey::random(&mut rand::thread_rng());
        let verifying = *signing.verifying_key();
        (signing, verifying)
    }

    #[test]
    fn valid_signature_verifies() {
        let (signing, verifying) = keypair();
        let assertion = signed_assertion(&signing);
        assert_eq!(verify_assertion(&assertion, &verifying), Ok(true));
    }

    #[test]
    fn flipping_any_input_bit_fails_verification() {
        let (signing, verifying) = keypair();

        let mut tampered_client_data = signed_assertion(&signing);
        tampered_client_data.client_data_json[0] ^= 0x01;
        assert_eq!(
            verify_assertion(&tampered_client_data, &verifying),
            Ok(false)
        );

        let mut tampered_auth_data = signed_assertion(&signing);
        tampered_auth_data.authenticator_data[0] ^= 0x01;
        assert_eq!(verify_assertion(&tampered_auth_data, &verifying), Ok(false));

        // flip a bit in the s component, leaving the DER framing intact
        let mut tampered_signature = signed_assertion(&signing);
        let last = tampered_signature.signature.len() - 1;
        tampered_signature.signature[last] ^= 0x01;
        match verify_assertion(&tampered_signature, &verifying) {
            // a flipped byte can also push s out of range, which surfaces as
            // a DER-level rejection; both are a failed verification
            Ok(false) | Err(SignatureError::InvalidSignatureEncoding) => {}
            other => panic!("tampered signature verified: {other:?}"),
        }
    }

    #[test]
    fn wrong_key_fails_verification() {
        let (signing, _) = keypair();
        let (_, other_verifying) = keypair();
        let assertion = signed_assertion(&signing);
        assert_eq!(verify_assertion(&assertion, &other_verifying), Ok(false));
    }

    #[test]
    fn garbage_signature_encoding_is_an_error() {
        let (signing, verifying) = keypair();
        let mut assertion = signed_assertion(&signing);
        assertion.signature = vec![0x00, 0x01, 0x02].into();
        assert_eq!(
            verify_assertion(&assertion, &verifying),
            Err(SignatureError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn verification_is_deterministic() {
        let (signing, verifying) = keypair();
        let assertion = signed_assertion(&signing);
        let first = verify_assertion(&assertion, &verifying);
        let second = verify_assertion(&assertion, &verifying);
        assert_eq!(first, second);
        assert_eq!(first, Ok(true));
    }
}
