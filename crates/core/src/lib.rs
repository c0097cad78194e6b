//! Core primitives for starchain.
//!
//! This crate provides the fundamental types used throughout the chain:
//! - Blake3 hashing
//! - Ed25519 identities and signatures
//! - Blocks, pending and sealed
//! - The payload codec
//! - Ownership challenges

pub mod block;
pub mod challenge;
pub mod crypto;
pub mod hash;
pub mod payload;

// Re-export commonly used types at the crate root
pub use block::{Block, PendingBlock};
pub use challenge::{Challenge, ChallengeError, DEFAULT_DOMAIN_TAG};
pub use crypto::{CryptoError, Keypair, PublicKey, Signature};
pub use hash::{hash_concat, Hash};
pub use payload::{GenesisPayload, IdentityPayload, PayloadError, StarPayload};
