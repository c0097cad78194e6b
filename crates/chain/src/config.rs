//! Chain store configuration.

use starchain_core::DEFAULT_DOMAIN_TAG;

/// Default lifetime of a challenge, in seconds.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 300;

/// Default `data` carried by the genesis block.
pub const DEFAULT_GENESIS_DATA: &str = "Genesis Block";

/// Chain store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// A challenge older than this many seconds is expired.
    pub challenge_window_secs: u64,
    /// Tag embedded as the last field of every challenge.
    pub domain_tag: String,
    /// `data` field of the genesis payload.
    pub genesis_data: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            domain_tag: DEFAULT_DOMAIN_TAG.to_string(),
            genesis_data: DEFAULT_GENESIS_DATA.to_string(),
        }
    }
}
