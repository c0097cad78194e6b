//! JSON codec for block payloads.
//!
//! Blocks carry their payload as opaque bytes. The two shapes the chain
//! itself produces are [`GenesisPayload`] and [`StarPayload`]; anything else
//! is application-defined and simply fails to decode as those.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from encoding or decoding a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("payload decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode a value into payload bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, PayloadError> {
    serde_json::to_vec(value).map_err(PayloadError::Encode)
}

/// Decode payload bytes into a value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PayloadError> {
    serde_json::from_slice(bytes).map_err(PayloadError::Decode)
}

/// Payload of the genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPayload {
    pub data: String,
}

/// Payload of a user submission: who registered it, and the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarPayload {
    pub identity: String,
    pub star: serde_json::Value,
}

/// Query-side view of any payload tagged with an identity. Content is
/// optional, so `{"identity": ..}` alone still matches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityPayload {
    pub identity: String,
    #[serde(default)]
    pub star: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_star_payload_wire_shape() {
        let payload = StarPayload {
            identity: "addr1".into(),
            star: json!({"dec": "68° 52' 56.9", "ra": "16h 29m 1.0s", "story": "found it"}),
        };
        let bytes = encode(&payload).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["identity"], "addr1");
        assert_eq!(value["star"]["story"], "found it");
    }

    #[test]
    fn test_genesis_does_not_decode_as_star() {
        let bytes = encode(&GenesisPayload {
            data: "Genesis Block".into(),
        })
        .unwrap();
        assert!(decode::<StarPayload>(&bytes).is_err());
        assert_eq!(
            decode::<GenesisPayload>(&bytes).unwrap().data,
            "Genesis Block"
        );
    }

    #[test]
    fn test_identity_payload_without_content() {
        let payload: IdentityPayload = decode(br#"{"identity":"A"}"#).unwrap();
        assert_eq!(payload.identity, "A");
        assert_eq!(payload.star, None);

        let star = encode(&StarPayload {
            identity: "B".into(),
            star: json!({"story": "X"}),
        })
        .unwrap();
        let payload: IdentityPayload = decode(&star).unwrap();
        assert_eq!(payload.star, Some(json!({"story": "X"})));

        let genesis = encode(&GenesisPayload {
            data: "Genesis Block".into(),
        })
        .unwrap();
        assert!(decode::<IdentityPayload>(&genesis).is_err());
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let err = decode::<StarPayload>(b"\xff\x00not json").unwrap_err();
        assert!(matches!(err, PayloadError::Decode(_)));
    }
}
