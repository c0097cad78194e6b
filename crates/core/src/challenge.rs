//! Ownership challenges.
//!
//! A challenge is the message a client signs to prove it holds the key behind
//! an identity: `"{identity}:{issued_at}:{tag}"`, where `issued_at` is whole
//! Unix seconds and `tag` is a fixed domain string.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain tag embedded in every challenge issued by default.
pub const DEFAULT_DOMAIN_TAG: &str = "starRegistry";

/// Errors from parsing a challenge string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("malformed challenge: {0}")]
    Malformed(String),
}

/// A parsed challenge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub identity: String,
    pub issued_at: u64,
    pub tag: String,
}

impl Challenge {
    /// Issue a challenge for `identity` at time `now`.
    pub fn new(identity: impl Into<String>, issued_at: u64, tag: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            issued_at,
            tag: tag.into(),
        }
    }

    /// Seconds elapsed between issuance and `now`.
    ///
    /// A challenge stamped in the future (clock skew) counts as zero elapsed.
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.issued_at)
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.identity, self.issued_at, self.tag)
    }
}

impl FromStr for Challenge {
    type Err = ChallengeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [identity, issued_at, tag] = parts.as_slice() else {
            return Err(ChallengeError::Malformed(format!(
                "expected 3 colon-separated fields, got {}",
                parts.len()
            )));
        };

        if identity.is_empty() {
            return Err(ChallengeError::Malformed("empty identity".into()));
        }

        let issued_at = issued_at
            .parse::<u64>()
            .map_err(|_| ChallengeError::Malformed(format!("bad timestamp {issued_at:?}")))?;

        Ok(Self::new(*identity, issued_at, *tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_format() {
        let c = Challenge::new("addr1", 1_700_000_000, DEFAULT_DOMAIN_TAG);
        assert_eq!(c.to_string(), "addr1:1700000000:starRegistry");
    }

    #[test]
    fn test_challenge_parse() {
        let c: Challenge = "addr1:1700000000:starRegistry".parse().unwrap();
        assert_eq!(c.identity, "addr1");
        assert_eq!(c.issued_at, 1_700_000_000);
        assert_eq!(c.tag, "starRegistry");
    }

    #[test]
    fn test_challenge_parse_rejects_bad_timestamp() {
        assert!("addr1:yesterday:starRegistry".parse::<Challenge>().is_err());
        assert!("addr1:-5:starRegistry".parse::<Challenge>().is_err());
    }

    #[test]
    fn test_challenge_parse_rejects_wrong_arity() {
        assert!("addr1:1700000000".parse::<Challenge>().is_err());
        assert!("a:1:b:c".parse::<Challenge>().is_err());
        assert!(":1:starRegistry".parse::<Challenge>().is_err());
    }

    #[test]
    fn test_elapsed_saturates() {
        let c = Challenge::new("a", 100, "t");
        assert_eq!(c.elapsed(400), 300);
        assert_eq!(c.elapsed(50), 0);
    }
}
