//! Blocks: pending (unsealed) and sealed.
//!
//! A [`PendingBlock`] only carries its payload. The chain store seals it
//! exactly once, assigning height, link and timestamp, and computing the
//! content hash over those fields. The stored `hash` is never fed back into
//! the hash function.

use crate::hash::{hash_concat, Hash};
use crate::payload::{self, PayloadError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A block that has not been placed in a chain yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBlock {
    payload: Vec<u8>,
}

impl PendingBlock {
    /// Create a pending block from raw payload bytes.
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Create a pending block by encoding `value` with the payload codec.
    pub fn from_payload<T: Serialize>(value: &T) -> Result<Self, PayloadError> {
        Ok(Self::new(payload::encode(value)?))
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Seal this block at a chain position.
    pub fn seal(self, height: u64, previous_hash: Hash, timestamp: u64) -> Block {
        let mut block = Block {
            height,
            previous_hash,
            timestamp,
            payload: self.payload,
            hash: Hash::ZERO,
        };
        block.hash = block.compute_hash();
        block
    }
}

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block height (0 for genesis).
    pub height: u64,
    /// Hash of the block at `height - 1`, or [`Hash::ZERO`] for genesis.
    pub previous_hash: Hash,
    /// Unix timestamp in seconds, assigned when sealed.
    pub timestamp: u64,
    /// Encoded payload, hex on the wire.
    #[serde(rename = "body", with = "payload_hex")]
    pub payload: Vec<u8>,
    /// Content hash over every field above.
    pub hash: Hash,
}

mod payload_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

impl Block {
    /// Recompute the content hash from the sealed fields, excluding `hash`.
    ///
    /// Layout: `height (u64 LE) || previous_hash || timestamp (u64 LE) ||
    /// payload length (u64 LE) || payload`.
    pub fn compute_hash(&self) -> Hash {
        hash_concat(&[
            &self.height.to_le_bytes(),
            self.previous_hash.as_bytes(),
            &self.timestamp.to_le_bytes(),
            &(self.payload.len() as u64).to_le_bytes(),
            &self.payload,
        ])
    }

    /// Whether the stored hash matches the sealed content.
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_zero()
    }

    /// Decode the payload with the payload codec.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        payload::decode(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{GenesisPayload, StarPayload};
    use serde_json::json;

    fn genesis() -> Block {
        PendingBlock::from_payload(&GenesisPayload {
            data: "Genesis Block".into(),
        })
        .unwrap()
        .seal(0, Hash::ZERO, 1_700_000_000)
    }

    #[test]
    fn test_seal_assigns_fields_and_hash() {
        let block = genesis();
        assert!(block.is_genesis());
        assert_eq!(block.timestamp, 1_700_000_000);
        assert_ne!(block.hash, Hash::ZERO);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(genesis().hash, genesis().hash);
    }

    #[test]
    fn test_hash_ignores_stored_hash() {
        let mut block = genesis();
        let expected = block.compute_hash();
        block.hash = Hash::from_bytes([7u8; 32]);
        assert_eq!(block.compute_hash(), expected);
        assert!(!block.has_valid_hash());
    }

    #[test]
    fn test_tampering_any_field_breaks_hash() {
        let base = genesis();

        let mut b = base.clone();
        b.height = 1;
        assert!(!b.has_valid_hash());

        let mut b = base.clone();
        b.previous_hash = Hash::from_bytes([1u8; 32]);
        assert!(!b.has_valid_hash());

        let mut b = base.clone();
        b.timestamp += 1;
        assert!(!b.has_valid_hash());

        let mut b = base;
        b.payload.push(b' ');
        assert!(!b.has_valid_hash());
    }

    #[test]
    fn test_decode_payload() {
        let star = StarPayload {
            identity: "addr1".into(),
            star: json!({"story": "X"}),
        };
        let block = PendingBlock::from_payload(&star)
            .unwrap()
            .seal(1, Hash::ZERO, 0);
        assert_eq!(block.decode_payload::<StarPayload>().unwrap(), star);
        assert!(genesis().decode_payload::<StarPayload>().is_err());
    }

    #[test]
    fn test_block_json_carries_hex_body() {
        let block = genesis();
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["height"], 0);
        assert_eq!(value["previous_hash"], Hash::ZERO.to_hex());
        assert_eq!(value["body"], hex::encode(&block.payload));

        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }
}
