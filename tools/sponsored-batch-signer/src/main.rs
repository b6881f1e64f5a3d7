use std::{fs, path::PathBuf};

use alloy_primitives::{Address, Bytes};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use k256::ecdsa::SigningKey;
use serde::Serialize;
use sponsored_batch_signer::{
    encoder::{account_address, digest_report, parse_private_key, sign_authorization, verify_request},
    types::SignRequest,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build and sign authorizations for the sponsored batch delegate.
///
/// The request file is JSON: `{ "nonce", "deadline", "calls": [{ "target", "value", "data" }],
/// "fee": { "asset", "amount", "receiver" } }`, numbers as `0x` hex. Read the nonce from
/// `nonce()` on the account before signing.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign a request with the account key and print the authorization for the sponsor.
    Sign {
        #[command(flatten)]
        request: RequestArgs,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Print the calls fingerprint and digest of a request without signing.
    Digest {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Check that a signature over a request recovers to the given account.
    Verify {
        #[command(flatten)]
        request: RequestArgs,
        /// Account the signature must belong to.
        #[arg(long)]
        account: Address,
        /// 65-byte signature, 0x hex.
        #[arg(long)]
        signature: Bytes,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Path to the JSON request.
    #[arg(long)]
    request: PathBuf,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Path to a file containing the account private key.
    #[arg(long, env = "SIGNER_PRIVATE_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Account private key (hex string, 0x...).
    #[arg(long, env = "SIGNER_PRIVATE_KEY", hide_env_values = true, conflicts_with = "private_key_path")]
    private_key: Option<String>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Sign { request, key } => {
            let request = read_request(&request)?;
            let key = load_key(&key)?;
            let signed = sign_authorization(&key, &request).context("failed to sign authorization")?;
            info!(account = %signed.account, nonce = %signed.nonce, "authorization signed");
            print_json(&signed)
        }
        Command::Digest { request } => {
            let request = read_request(&request)?;
            print_json(&digest_report(&request))
        }
        Command::Verify {
            request,
            account,
            signature,
        } => {
            let request = read_request(&request)?;
            verify_request(&request, &signature, account)
                .map_err(|err| anyhow!("signature rejected: {err:?}"))?;
            info!(%account, "signature matches account");
            println!("ok");
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(args: &RequestArgs) -> Result<SignRequest> {
    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read {}", args.request.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid request in {}", args.request.display()))
}

fn load_key(args: &KeyArgs) -> Result<SigningKey> {
    let raw = if let Some(ref path) = args.private_key_path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else if let Some(ref pk) = args.private_key {
        pk.clone()
    } else {
        return Err(anyhow!(
            "missing account key: provide --private-key-path or --private-key (or set SIGNER_PRIVATE_KEY_PATH/SIGNER_PRIVATE_KEY)"
        ));
    };
    let key = parse_private_key(&raw).context("invalid private key")?;
    info!(account = %account_address(&key), "loaded account key");
    Ok(key)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
