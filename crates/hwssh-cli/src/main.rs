// ABOUTME: Entry point for the hwssh tool
// ABOUTME: Inspects identity paths, SSH challenge blobs and device public keys offline

use anyhow::Result;
use clap::{Parser, Subcommand};
use hwssh_cli::{commands, Config};
use hwssh_core::Curve;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hwssh", about = "Inspect hardware-backed SSH identities")]
struct Cli {
    /// Config file (defaults to ~/.config/hwssh/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the canonical label and derived key path for an identity
    Identity {
        /// Label such as alice@git.example.com:22/repo
        label: String,

        /// Key index (defaults to the configured index)
        #[arg(long)]
        index: Option<u32>,
    },

    /// Decode a hex-encoded SSH authentication challenge
    Challenge {
        /// Challenge blob as hex
        blob: String,
    },

    /// Render a device-returned compressed public key in OpenSSH format
    Pubkey {
        /// Compressed public key as hex
        key: String,

        /// Label to attach as the key comment
        #[arg(long, short = 'l')]
        label: String,

        /// Curve the key is on (nist256p1 or ed25519)
        #[arg(long)]
        curve: Option<Curve>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    hwssh_log::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let report = match cli.command {
        Command::Identity { label, index } => {
            commands::identity(&label, index.unwrap_or(config.index))?
        }
        Command::Challenge { blob } => commands::challenge(&blob)?,
        Command::Pubkey { key, label, curve } => {
            commands::pubkey(&key, &label, curve.unwrap_or(config.curve))?
        }
    };
    println!("{report}");

    Ok(())
}
