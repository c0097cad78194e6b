//! Proof-of-ownership verification.

use starchain_core::{PublicKey, Signature};
use thiserror::Error;

/// Failure of the verification machinery itself, as opposed to a signature
/// that simply does not verify.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// Checks that `signature` over `message` was produced by the holder of
/// `identity`.
///
/// `Ok(false)` means the proof is wrong. `Err` means no answer could be
/// obtained.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, message: &str, identity: &str, signature: &str) -> Result<bool, VerifierError>;
}

/// Ed25519 verifier: identities are hex public keys, signatures are hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl ProofVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, identity: &str, signature: &str) -> Result<bool, VerifierError> {
        let Ok(public_key) = PublicKey::from_identity(identity) else {
            return Ok(false);
        };
        let Ok(signature) = Signature::from_hex(signature) else {
            return Ok(false);
        };
        Ok(public_key.verify(message.as_bytes(), &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starchain_core::Keypair;

    #[test]
    fn test_valid_signature_verifies() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"challenge").to_hex();
        assert!(Ed25519Verifier
            .verify("challenge", &kp.identity(), &sig)
            .unwrap());
    }

    #[test]
    fn test_signature_from_other_key_rejected() {
        let kp = Keypair::generate();
        let other = Keypair::generate();
        let sig = other.sign(b"challenge").to_hex();
        assert!(!Ed25519Verifier
            .verify("challenge", &kp.identity(), &sig)
            .unwrap());
    }

    #[test]
    fn test_malformed_inputs_are_false_not_errors() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"m").to_hex();
        assert!(!Ed25519Verifier.verify("m", "nothex", &sig).unwrap());
        assert!(!Ed25519Verifier.verify("m", &kp.identity(), "00").unwrap());
    }
}
