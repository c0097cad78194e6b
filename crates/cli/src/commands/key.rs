//! Identity key management command.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use starchain_core::Keypair;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    command: KeyCommand,
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Generate a new identity keypair
    New {
        /// Directory holding key files
        #[arg(short, long, default_value = "./keys")]
        keys_dir: PathBuf,

        /// Name for the key file
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the identity of a stored key
    Show {
        /// Directory holding key files
        #[arg(short, long, default_value = "./keys")]
        keys_dir: PathBuf,

        /// Key name (file without .json extension)
        name: String,
    },
    /// List stored keys
    List {
        /// Directory holding key files
        #[arg(short, long, default_value = "./keys")]
        keys_dir: PathBuf,
    },
}

/// On-disk key file.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyFile {
    pub identity: String,
    pub private_key: String,
}

pub fn run(args: KeyArgs) -> Result<()> {
    match args.command {
        KeyCommand::New { keys_dir, name } => new_key(keys_dir, name),
        KeyCommand::Show { keys_dir, name } => show_key(keys_dir, name),
        KeyCommand::List { keys_dir } => list_keys(keys_dir),
    }
}

fn new_key(keys_dir: PathBuf, name: Option<String>) -> Result<()> {
    let keypair = Keypair::generate();
    let identity = keypair.identity();

    let name = name.unwrap_or_else(|| format!("identity_{}", &identity[..8]));
    let key_file = save_keypair(&keys_dir, &name, &keypair)?;

    println!("{}", "Generated new identity:".bold().cyan());
    println!();
    println!("  Identity:    {}", identity.bright_yellow());
    println!(
        "  Private Key: {}",
        hex::encode(keypair.private_key()).bright_black()
    );
    println!();
    println!(
        "{}  Saved to: {}",
        "✓".green().bold(),
        key_file.display().to_string().bright_black()
    );
    println!();
    println!("{}", "Keep your private key safe!".yellow().bold());

    Ok(())
}

fn show_key(keys_dir: PathBuf, name: String) -> Result<()> {
    let keypair = load_keypair(&keys_dir, &name)?;
    println!("{}", keypair.identity());
    Ok(())
}

fn list_keys(keys_dir: PathBuf) -> Result<()> {
    if !keys_dir.exists() {
        println!("No keys found in {}", keys_dir.display());
        return Ok(());
    }

    println!();
    println!("{}", "Stored identities:".bold().cyan());
    println!();

    let mut entries: Vec<_> = fs::read_dir(&keys_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_key_file(&path) {
            Ok(file) => println!("  {} {}", name.bold(), file.identity.bright_yellow()),
            Err(_) => println!("  {} {}", name.bold(), "(unreadable)".red()),
        }
    }

    println!();
    Ok(())
}

/// Write `keypair` to `{keys_dir}/{name}.json`, refusing to overwrite.
pub fn save_keypair(keys_dir: &Path, name: &str, keypair: &Keypair) -> Result<PathBuf> {
    fs::create_dir_all(keys_dir)
        .with_context(|| format!("Failed to create keys directory: {}", keys_dir.display()))?;

    let key_file = keys_dir.join(format!("{}.json", name));
    if key_file.exists() {
        bail!("Key file already exists: {}", key_file.display());
    }

    let contents = KeyFile {
        identity: keypair.identity(),
        private_key: hex::encode(keypair.private_key()),
    };
    fs::write(&key_file, serde_json::to_string_pretty(&contents)?)?;
    Ok(key_file)
}

fn read_key_file(path: &Path) -> Result<KeyFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;
    serde_json::from_str(&contents).context("Malformed key file")
}

/// Load `{keys_dir}/{name}.json` and check it is self-consistent.
pub fn load_keypair(keys_dir: &Path, name: &str) -> Result<Keypair> {
    let key_file = keys_dir.join(format!("{}.json", name));
    if !key_file.exists() {
        bail!(
            "Key file not found: {}. Use 'starchain key new' to create one.",
            key_file.display()
        );
    }

    let file = read_key_file(&key_file)?;
    let keypair =
        Keypair::from_private_key_hex(&file.private_key).context("Invalid private key")?;

    if keypair.identity() != file.identity {
        bail!(
            "Key file {} is inconsistent: private key does not match identity",
            key_file.display()
        );
    }

    Ok(keypair)
}
