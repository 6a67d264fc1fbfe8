//! servname CLI
//!
//! Packs server connection parameters into signed, filename-safe tokens and
//! recovers them. Thin glue around servname-core: argument parsing,
//! interactive prompting, environment key loading, filename decoration.

use anyhow::{bail, Context, Result};
use base64::prelude::*;
use clap::{Parser, Subcommand};
use tracing::debug;

use servname_core::{decode, encode, PublicKey, ServerRecord, SigningKey};

mod naming;

/// Verification key baked into every build. Tokens signed by the matching
/// private key verify against this; it never changes at runtime.
const VERIFY_KEY: PublicKey = PublicKey::from_bytes([
    88, 168, 68, 104, 60, 5, 163, 198, 165, 38, 12, 85, 114, 203, 96, 163, 70, 48, 0, 131, 57,
    12, 46, 129, 83, 17, 84, 193, 119, 197, 130, 103,
]);

/// Environment variable holding the optional signing key: 64 keypair bytes
/// (seed then public key), standard base64. Absent means unsigned tokens.
const SIGNING_KEY_ENV: &str = "ED25519_PRIVATE_KEY";

#[derive(Parser)]
#[command(name = "servname")]
#[command(about = "Pack server connection parameters into signed, filename-safe tokens")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show each transform stage on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode connection parameters into a licensed filename
    Encode {
        /// License key
        key: String,
        /// Host address
        host: String,
        /// Api server address (optional)
        api: Option<String>,
        /// Relay server address (optional)
        relay: Option<String>,
    },

    /// Decode a licensed filename (or bare token) back into its parameters
    Decode {
        /// Filename or token to decode
        name: String,
    },

    /// Generate a fresh signing keypair (developer tool)
    Keygen,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Encode {
            key,
            host,
            api,
            relay,
        }) => {
            let record = ServerRecord::new(host, key)?
                .with_api(api.unwrap_or_default())
                .with_relay(relay.unwrap_or_default());
            let token = encode_record(&record)?;
            println!("{}", naming::licensed_name(&token));
            Ok(())
        }
        Some(Commands::Decode { name }) => run_decode(&name),
        Some(Commands::Keygen) => run_keygen(),
        None => {
            let record = prompt_for_record()?;
            let token = encode_record(&record)?;
            println!("{}", naming::interactive_name(&token));
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn encode_record(record: &ServerRecord) -> Result<String> {
    let signing_key = signing_key_from_env()?;
    debug!(
        host = record.host(),
        signed = signing_key.is_some(),
        "encoding record"
    );
    let token = encode(record, signing_key.as_ref())?;
    debug!(%token, "token produced");
    Ok(token)
}

fn run_decode(name: &str) -> Result<()> {
    let token = naming::strip_name(name);
    debug!(%token, "stripped filename decoration");
    let decoded = decode(&token, Some(&VERIFY_KEY))?;
    debug!(signed = decoded.is_signed(), "token decoded");

    let record = decoded.into_record();
    println!("Decoded server configuration:");
    println!("  key:   {}", record.key());
    println!("  host:  {}", record.host());
    println!("  api:   {}", record.api());
    println!("  relay: {}", record.relay());
    Ok(())
}

fn run_keygen() -> Result<()> {
    let key = SigningKey::generate();
    println!(
        "{}={}",
        SIGNING_KEY_ENV,
        BASE64_STANDARD.encode(key.to_keypair_bytes())
    );
    println!("public key (hex): {}", key.public_key().to_hex());
    println!("public key (bytes): {:?}", key.public_key().as_bytes());
    Ok(())
}

/// Load the optional signing key from the environment.
fn signing_key_from_env() -> Result<Option<SigningKey>> {
    match std::env::var(SIGNING_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => parse_signing_key(value.trim()).map(Some),
        _ => Ok(None),
    }
}

/// Parse a standard-base64 64-byte keypair buffer.
fn parse_signing_key(encoded: &str) -> Result<SigningKey> {
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .with_context(|| format!("{SIGNING_KEY_ENV} is not valid base64"))?;
    SigningKey::from_keypair_bytes(&bytes)
        .with_context(|| format!("{SIGNING_KEY_ENV} is not a valid Ed25519 keypair"))
}

/// Collect a record interactively. Input is hidden; values are trimmed.
fn prompt_for_record() -> Result<ServerRecord> {
    eprintln!("No command given. Entering interactive mode.");

    let key = prompt_required("key")?;
    let host = prompt_required("host")?;
    let api = prompt_optional("api")?;
    let relay = prompt_optional("relay")?;

    Ok(ServerRecord::new(host, key)?.with_api(api).with_relay(relay))
}

fn prompt_required(label: &str) -> Result<String> {
    let value = rpassword::prompt_password(format!("Enter {label}: "))
        .with_context(|| format!("failed to read {label}"))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        bail!("{label} is required");
    }
    Ok(value)
}

fn prompt_optional(label: &str) -> Result<String> {
    let value =
        rpassword::prompt_password(format!("Enter {label} (optional, press Enter to skip): "))
            .with_context(|| format!("failed to read {label}"))?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_key_is_valid_curve_point() {
        // A signature from some other key must fail verification, not key
        // construction
        let other = SigningKey::from_seed(&[7; 32]);
        let sig = other.sign(b"message");
        assert!(matches!(
            VERIFY_KEY.verify(b"message", &sig),
            Err(servname_core::Error::SignatureInvalid)
        ));
    }

    #[test]
    fn parse_signing_key_roundtrip() {
        let key = SigningKey::generate();
        let encoded = BASE64_STANDARD.encode(key.to_keypair_bytes());
        let parsed = parse_signing_key(&encoded).unwrap();
        assert_eq!(parsed.public_key(), key.public_key());
    }

    #[test]
    fn parse_signing_key_rejects_bad_input() {
        assert!(parse_signing_key("not base64!").is_err());
        // Valid base64 of the wrong length
        assert!(parse_signing_key(&BASE64_STANDARD.encode([0u8; 32])).is_err());
    }
}
