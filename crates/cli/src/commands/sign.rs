//! Challenge signing and signature verification.

use super::key::load_keypair;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use starchain_chain::{Ed25519Verifier, ProofVerifier};
use starchain_core::Challenge;
use std::path::PathBuf;

#[derive(Args)]
pub struct SignArgs {
    /// Directory holding key files
    #[arg(short, long, default_value = "./keys")]
    keys_dir: PathBuf,

    /// Key name (file without .json extension)
    #[arg(short, long)]
    key: String,

    /// Challenge message to sign, exactly as issued
    message: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Identity (hex public key) that supposedly signed
    #[arg(short, long)]
    identity: String,

    /// Hex signature
    #[arg(short, long)]
    signature: String,

    /// Signed message
    message: String,
}

pub fn sign(args: SignArgs) -> Result<()> {
    let keypair = load_keypair(&args.keys_dir, &args.key)?;

    // Catch the common mistake of signing a challenge issued to another key.
    if let Ok(challenge) = args.message.parse::<Challenge>() {
        if challenge.identity != keypair.identity() {
            eprintln!(
                "{} challenge was issued to {}, not to key '{}'",
                "warning:".yellow().bold(),
                challenge.identity,
                args.key
            );
        }
    }

    println!("{}", keypair.sign(args.message.as_bytes()).to_hex());
    Ok(())
}

pub fn verify(args: VerifyArgs) -> Result<()> {
    let valid = Ed25519Verifier.verify(&args.message, &args.identity, &args.signature)?;
    if !valid {
        bail!("signature does not verify for identity {}", args.identity);
    }
    println!("{}  Signature is valid", "✓".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::key::save_keypair;
    use starchain_core::Keypair;

    #[test]
    fn test_sign_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let keypair = Keypair::generate();
        save_keypair(dir.path(), "alice", &keypair).unwrap();

        let message = format!("{}:1700000000:starRegistry", keypair.identity());
        sign(SignArgs {
            keys_dir: dir.path().to_path_buf(),
            key: "alice".into(),
            message: message.clone(),
        })
        .unwrap();

        let signature = keypair.sign(message.as_bytes()).to_hex();
        assert!(verify(VerifyArgs {
            identity: keypair.identity(),
            signature,
            message,
        })
        .is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_identity() {
        let keypair = Keypair::generate();
        let other = Keypair::generate();
        let signature = keypair.sign(b"msg").to_hex();

        assert!(verify(VerifyArgs {
            identity: other.identity(),
            signature,
            message: "msg".into(),
        })
        .is_err());
    }
}
