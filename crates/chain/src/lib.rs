//! Chain maintenance for starchain.
//!
//! This crate owns the append-only block sequence:
//! - **Store**: single-writer append with full re-validation and rollback
//! - **Proofs**: time-boxed challenges and signature-gated submissions
//! - **Queries**: lookup by hash, height, or registering identity
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use starchain_chain::{ChainConfig, ChainStore, Ed25519Verifier, SystemClock};
//! use starchain_core::Keypair;
//!
//! let store = ChainStore::new(
//!     ChainConfig::default(),
//!     Arc::new(Ed25519Verifier),
//!     Arc::new(SystemClock),
//! )
//! .unwrap();
//!
//! let keypair = Keypair::generate();
//! let challenge = store.request_challenge(&keypair.identity());
//! let signature = keypair.sign(challenge.as_bytes()).to_hex();
//!
//! let star = serde_json::json!({ "story": "first light" });
//! let block = store
//!     .submit_proof(&keypair.identity(), &challenge, &signature, star)
//!     .unwrap();
//!
//! assert_eq!(block.height, 1);
//! assert!(store.validate().is_empty());
//! ```

pub mod clock;
pub mod config;
pub mod store;
pub mod verifier;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChainConfig, DEFAULT_CHALLENGE_WINDOW_SECS, DEFAULT_GENESIS_DATA};
pub use store::{validate_blocks, ChainError, ChainStore, IntegrityError, Result};
pub use verifier::{Ed25519Verifier, ProofVerifier, VerifierError};
