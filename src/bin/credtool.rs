//! Provisioning helper for the credential sources.
//!
//! - `hash-password`: stored-hash value for the `users` table
//! - `generate-api-key`: random URL-safe key for the `api_keys` table
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use clap::{Parser, Subcommand};

use auth_gateway::services::auth::password::{PasswordHasher, SaltedSha256};

#[derive(Parser, Debug)]
#[command(name = "credtool", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a salted hash (sha256$<salt>$<digest>) for a password
    HashPassword {
        password: String,
    },

    /// Print a new random API key
    GenerateApiKey {
        /// Prepended verbatim, e.g. `pk_`
        #[arg(long, default_value = "")]
        prefix: String,

        /// Random bytes before encoding
        #[arg(long, default_value_t = 32)]
        bytes: usize,
    },
}

fn generate_api_key(prefix: &str, bytes: usize) -> Result<String, getrandom::Error> {
    let mut buf = vec![0u8; bytes.max(16)];
    getrandom::fill(&mut buf)?;
    Ok(format!("{prefix}{}", URL_SAFE_NO_PAD.encode(buf)))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::HashPassword { password } => {
            let hash = SaltedSha256.hash(&password)?;
            println!("{hash}");
        }
        Command::GenerateApiKey { prefix, bytes } => {
            let key = generate_api_key(&prefix, bytes)
                .map_err(|e| anyhow::anyhow!("random source failure: {e}"))?;
            println!("{key}");
        }
    }

    Ok(())
}
