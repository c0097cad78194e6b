//! Command-line arguments for `starchain-server`.

use crate::logging::LogFormat;
use clap::Parser;
use starchain_chain::{ChainConfig, DEFAULT_CHALLENGE_WINDOW_SECS, DEFAULT_GENESIS_DATA};
use starchain_core::DEFAULT_DOMAIN_TAG;
use std::net::SocketAddr;

/// Serve a volatile star registry chain over HTTP.
///
/// The chain lives in memory and starts from a fresh genesis block on every
/// launch.
#[derive(Parser, Debug)]
#[command(name = "starchain-server", version, about = "HTTP API for starchain")]
pub struct ServerCli {
    /// Address to listen on.
    #[arg(long, env = "STARCHAIN_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Seconds a challenge stays valid after it is issued.
    #[arg(long, env = "STARCHAIN_CHALLENGE_WINDOW", default_value_t = DEFAULT_CHALLENGE_WINDOW_SECS)]
    pub challenge_window: u64,

    /// Domain tag embedded in every challenge.
    #[arg(long, env = "STARCHAIN_DOMAIN_TAG", default_value = DEFAULT_DOMAIN_TAG)]
    pub domain_tag: String,

    /// `data` carried by the genesis block.
    #[arg(long, env = "STARCHAIN_GENESIS_DATA", default_value = DEFAULT_GENESIS_DATA)]
    pub genesis_data: String,

    /// Log output format.
    #[arg(long, env = "STARCHAIN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerCli {
    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            challenge_window_secs: self.challenge_window,
            domain_tag: self.domain_tag.clone(),
            genesis_data: self.genesis_data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_chain_defaults() {
        let cli = ServerCli::parse_from(["starchain-server"]);
        assert_eq!(cli.chain_config(), ChainConfig::default());
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let cli = ServerCli::parse_from([
            "starchain-server",
            "--bind",
            "0.0.0.0:9000",
            "--challenge-window",
            "60",
            "--domain-tag",
            "otherTag",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.bind.port(), 9000);
        assert_eq!(cli.chain_config().challenge_window_secs, 60);
        assert_eq!(cli.chain_config().domain_tag, "otherTag");
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
