//! starchain CLI entry point.

use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "starchain")]
#[command(about = "Identity and signing tools for starchain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("starchain - identity and signing tools for the star registry");
            println!("Run 'starchain --help' for usage information.");
        }
    }
}
