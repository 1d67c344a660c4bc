//! canonpack CLI - build, sign, and verify dataset release packs.

use clap::{Parser, Subcommand};

mod commands;

use commands::{build, canonicalize, redirects, sign, verify};

#[derive(Parser)]
#[command(name = "canonpack")]
#[command(about = "Canonpack dataset release building and verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a release pack from a dataset root
    Build {
        /// Path to the dataset root
        canon: String,
        /// Output directory for the pack
        out: String,
        /// Opaque dataset version label recorded in the manifest
        #[arg(long, default_value = "local")]
        canon_version: String,
        /// External validator command to run over the dataset before building
        #[arg(long)]
        validator: Option<String>,
    },
    /// Sign a pack's manifest with an Ed25519 key
    Sign {
        /// Path to the pack directory
        pack: String,
        /// Path to the raw 32-byte signing key
        #[arg(long)]
        key: String,
    },
    /// Verify a pack's payload integrity and, with a public key, its signature
    Verify {
        /// Path to the pack directory
        pack: String,
        /// Path to the raw 32-byte public key (hash-only check when omitted)
        #[arg(long)]
        public_key: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a dataset's identity redirect map
    Redirects {
        /// Path to the dataset root
        canon: String,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            canon,
            out,
            canon_version,
            validator,
        } => build::run(canon, out, canon_version, validator),
        Commands::Sign { pack, key } => sign::run(pack, key),
        Commands::Verify {
            pack,
            public_key,
            json,
        } => verify::run(pack, public_key, json),
        Commands::Redirects { canon } => redirects::run(canon),
        Commands::Canonicalize { input } => canonicalize::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
