//! CLI commands module.

use anyhow::Result;
use clap::Subcommand;

mod key;
mod sign;

#[derive(Subcommand)]
pub enum Commands {
    /// Identity key management
    Key(key::KeyArgs),
    /// Sign a challenge with a stored key
    Sign(sign::SignArgs),
    /// Verify a signature against an identity
    Verify(sign::VerifyArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Key(args) => key::run(args),
        Commands::Sign(args) => sign::sign(args),
        Commands::Verify(args) => sign::verify(args),
    }
}
