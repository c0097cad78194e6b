//! The chain store.
//!
//! Owns the sealed blocks and the single-writer append path. Every append
//! re-validates the whole chain before it is committed, and rolls back the
//! tentative block if validation finds anything wrong.

use crate::clock::Clock;
use crate::config::ChainConfig;
use crate::verifier::{ProofVerifier, VerifierError};
use parking_lot::RwLock;
use starchain_core::{
    Block, Challenge, ChallengeError, GenesisPayload, Hash, IdentityPayload, PayloadError,
    PendingBlock, StarPayload,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// An integrity violation found by [`ChainStore::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// The stored hash does not match the block's sealed content, or the
    /// block sits at the wrong index.
    InvalidBlock { height: u64 },
    /// `previous_hash` does not point at the preceding block (or is not the
    /// sentinel, for genesis).
    InvalidLink { height: u64 },
}

impl IntegrityError {
    pub fn height(&self) -> u64 {
        match self {
            Self::InvalidBlock { height } | Self::InvalidLink { height } => *height,
        }
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBlock { height } => write!(f, "invalid block at height {height}"),
            Self::InvalidLink { height } => {
                write!(f, "invalid previous-hash link at height {height}")
            }
        }
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("challenge expired: {elapsed}s elapsed, window is {window}s")]
    ChallengeExpired { elapsed: u64, window: u64 },

    #[error("invalid proof of ownership")]
    InvalidProof,

    #[error("chain corruption detected ({} errors), append rolled back", .0.len())]
    ChainCorruption(Vec<IntegrityError>),

    #[error(transparent)]
    MalformedChallenge(#[from] ChallengeError),

    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("proof verifier error: {0}")]
    Verifier(#[from] VerifierError),
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// Blocks plus the height counter. Guarded together so they never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ChainState {
    chain: Vec<Block>,
    height: u64,
}

impl ChainState {
    fn push(&mut self, block: Block) {
        self.chain.push(block);
        self.height += 1;
        debug_assert_eq!(self.height as usize, self.chain.len());
    }

    fn pop(&mut self) {
        self.chain.pop();
        self.height -= 1;
        debug_assert_eq!(self.height as usize, self.chain.len());
    }
}

/// Check every block's hash and link. Reports at most one error per block:
/// a content mismatch first, otherwise a broken link.
pub fn validate_blocks(blocks: &[Block]) -> Vec<IntegrityError> {
    let mut errors = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        let height = i as u64;

        if block.height != height || !block.has_valid_hash() {
            errors.push(IntegrityError::InvalidBlock { height });
            continue;
        }

        let expected_prev = match i {
            0 => Hash::ZERO,
            _ => blocks[i - 1].hash,
        };
        if block.previous_hash != expected_prev {
            errors.push(IntegrityError::InvalidLink { height });
        }
    }

    errors
}

/// Append-only, hash-linked block store with proof-gated submissions.
///
/// Appends are serialized by the write lock, which is held from the height
/// snapshot through the post-append validation. Queries take the read lock.
pub struct ChainStore {
    config: ChainConfig,
    verifier: Arc<dyn ProofVerifier>,
    clock: Arc<dyn Clock>,
    state: RwLock<ChainState>,
}

impl ChainStore {
    /// Create a store and seed it with the genesis block.
    pub fn new(
        config: ChainConfig,
        verifier: Arc<dyn ProofVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let genesis = PendingBlock::from_payload(&GenesisPayload {
            data: config.genesis_data.clone(),
        })?;

        let store = Self {
            config,
            verifier,
            clock,
            state: RwLock::new(ChainState::default()),
        };
        store.append(genesis)?;
        Ok(store)
    }

    // =========================================================================
    // Append
    // =========================================================================

    /// Seal `pending` on top of the current head and commit it.
    ///
    /// On a validation failure the block is removed again and the chain is
    /// left exactly as it was before the call.
    pub fn append(&self, pending: PendingBlock) -> Result<Block> {
        let mut state = self.state.write();

        let height = state.height;
        let previous_hash = match height {
            0 => Hash::ZERO,
            _ => match state.chain.last() {
                Some(head) => head.hash,
                None => {
                    return Err(ChainError::ChainCorruption(vec![
                        IntegrityError::InvalidLink { height },
                    ]))
                }
            },
        };
        let block = pending.seal(height, previous_hash, self.clock.now());

        state.push(block.clone());

        let errors = validate_blocks(&state.chain);
        if !errors.is_empty() {
            state.pop();
            tracing::error!(
                height,
                errors = ?errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "chain validation failed after append, rolled back"
            );
            return Err(ChainError::ChainCorruption(errors));
        }

        tracing::info!(height, hash = %block.hash, "block appended");
        Ok(block)
    }

    // =========================================================================
    // Ownership proofs
    // =========================================================================

    /// Issue a challenge message for `identity`.
    pub fn request_challenge(&self, identity: &str) -> String {
        Challenge::new(identity, self.clock.now(), self.config.domain_tag.as_str()).to_string()
    }

    /// Verify a signed challenge and append a block registering `star` to
    /// `identity`.
    ///
    /// Freshness and the signature are both evaluated; when both fail the
    /// expiry is reported. The verifier runs before the chain is locked.
    pub fn submit_proof(
        &self,
        identity: &str,
        challenge: &str,
        signature: &str,
        star: serde_json::Value,
    ) -> Result<Block> {
        let parsed: Challenge = challenge.parse()?;
        if parsed.tag != self.config.domain_tag {
            return Err(ChallengeError::Malformed(format!(
                "unexpected domain tag {:?}",
                parsed.tag
            ))
            .into());
        }

        let elapsed = parsed.elapsed(self.clock.now());
        let window = self.config.challenge_window_secs;

        let proof = if parsed.identity == identity {
            self.verifier.verify(challenge, identity, signature)
        } else {
            Ok(false)
        };

        if elapsed > window {
            tracing::warn!(identity, elapsed, window, "rejected expired challenge");
            return Err(ChainError::ChallengeExpired { elapsed, window });
        }
        if !proof? {
            tracing::warn!(identity, "rejected invalid proof");
            return Err(ChainError::InvalidProof);
        }

        let pending = PendingBlock::from_payload(&StarPayload {
            identity: identity.to_string(),
            star,
        })?;
        self.append(pending)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Re-scan the whole chain. An empty list means the chain is intact.
    pub fn validate(&self) -> Vec<IntegrityError> {
        validate_blocks(&self.state.read().chain)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of blocks in the chain.
    pub fn height(&self) -> u64 {
        self.state.read().height
    }

    /// The most recent block.
    pub fn head(&self) -> Option<Block> {
        self.state.read().chain.last().cloned()
    }

    /// Snapshot of every block, in height order.
    pub fn blocks(&self) -> Vec<Block> {
        self.state.read().chain.clone()
    }

    /// First block whose hash equals `hash`.
    pub fn get_by_hash(&self, hash: &Hash) -> Option<Block> {
        self.state
            .read()
            .chain
            .iter()
            .find(|block| block.hash == *hash)
            .cloned()
    }

    /// Block at `height`, if the chain is that long.
    pub fn get_by_height(&self, height: u64) -> Option<Block> {
        let index = usize::try_from(height).ok()?;
        self.state.read().chain.get(index).cloned()
    }

    /// Content registered by `identity`, in chain order.
    ///
    /// Blocks whose payload carries no `identity` field, or does not decode at
    /// all, are skipped. A matching payload without content yields `null`.
    pub fn get_payloads_by_identity(&self, identity: &str) -> Vec<serde_json::Value> {
        self.state
            .read()
            .chain
            .iter()
            .filter_map(|block| block.decode_payload::<IdentityPayload>().ok())
            .filter(|payload| payload.identity == identity)
            .map(|payload| payload.star.unwrap_or(serde_json::Value::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::verifier::Ed25519Verifier;
    use serde_json::json;

    const T0: u64 = 1_700_000_000;

    fn setup_store() -> (ChainStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let store = ChainStore::new(
            ChainConfig::default(),
            Arc::new(Ed25519Verifier),
            clock.clone(),
        )
        .unwrap();
        (store, clock)
    }

    fn star_block(identity: &str, story: &str) -> PendingBlock {
        PendingBlock::from_payload(&StarPayload {
            identity: identity.into(),
            star: json!({ "story": story }),
        })
        .unwrap()
    }

    #[test]
    fn test_tampered_payload_reports_one_error() {
        let (store, _) = setup_store();
        for i in 0..3 {
            store.append(star_block("A", &i.to_string())).unwrap();
        }

        store.state.write().chain[2].payload = b"{\"identity\":\"B\"}".to_vec();

        let errors = store.validate();
        assert_eq!(errors, vec![IntegrityError::InvalidBlock { height: 2 }]);
    }

    #[test]
    fn test_tampered_previous_hash_reports_one_error() {
        let (store, _) = setup_store();
        store.append(star_block("A", "x")).unwrap();
        store.append(star_block("A", "y")).unwrap();

        store.state.write().chain[1].previous_hash = Hash::from_bytes([9u8; 32]);

        assert_eq!(
            store.validate(),
            vec![IntegrityError::InvalidBlock { height: 1 }]
        );
    }

    #[test]
    fn test_resealed_block_breaks_links() {
        let (store, _) = setup_store();
        store.append(star_block("A", "x")).unwrap();
        store.append(star_block("A", "y")).unwrap();

        {
            let mut state = store.state.write();
            let block = &mut state.chain[1];
            block.previous_hash = Hash::from_bytes([9u8; 32]);
            block.hash = block.compute_hash();
        }

        let errors = store.validate();
        // Re-sealing block 1 changes its hash, so block 2's link breaks too.
        assert_eq!(
            errors,
            vec![
                IntegrityError::InvalidLink { height: 1 },
                IntegrityError::InvalidLink { height: 2 },
            ]
        );
    }

    #[test]
    fn test_tampered_timestamp_reports_one_error() {
        let (store, _) = setup_store();
        store.append(star_block("A", "x")).unwrap();

        store.state.write().chain[1].timestamp += 1;

        let errors = store.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].height(), 1);
        assert_eq!(errors[0].to_string(), "invalid block at height 1");
    }

    #[test]
    fn test_append_rolls_back_on_corruption() {
        let (store, clock) = setup_store();
        store.append(star_block("A", "x")).unwrap();

        store.state.write().chain[0].timestamp += 1;
        let before = store.state.read().clone();

        clock.advance(10);
        let err = store.append(star_block("A", "y")).unwrap_err();

        match err {
            ChainError::ChainCorruption(errors) => {
                assert_eq!(errors, vec![IntegrityError::InvalidBlock { height: 0 }]);
            }
            other => panic!("expected ChainCorruption, got {other:?}"),
        }
        assert_eq!(*store.state.read(), before);
        assert_eq!(store.height(), 2);
    }

    #[test]
    fn test_submit_proof_rolls_back_on_corruption() {
        let (store, _) = setup_store();
        let kp = starchain_core::Keypair::generate();

        store.state.write().chain[0].payload.clear();
        let before = store.state.read().clone();

        let challenge = store.request_challenge(&kp.identity());
        let sig = kp.sign(challenge.as_bytes()).to_hex();
        let err = store
            .submit_proof(&kp.identity(), &challenge, &sig, json!({"story": "X"}))
            .unwrap_err();

        assert!(matches!(err, ChainError::ChainCorruption(_)));
        assert_eq!(*store.state.read(), before);
    }

    #[test]
    fn test_height_tracks_chain_length() {
        let (store, _) = setup_store();
        for _ in 0..5 {
            store.append(star_block("A", "x")).unwrap();
            let state = store.state.read();
            assert_eq!(state.height as usize, state.chain.len());
        }
    }

    #[test]
    fn test_validate_blocks_empty_chain() {
        assert!(validate_blocks(&[]).is_empty());
    }
}
