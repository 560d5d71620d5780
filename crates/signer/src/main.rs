use std::io;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backendai_signer::{CallerContext, HeaderBuilder, SignatureRequest, SignerArgs, sign};

#[derive(Parser)]
#[command(about = "Sign a Backend.AI request and print its headers")]
struct Args {
    /// Caller identifier; "backend-ai-session" and "backend-ai-resource" sign
    /// with the Backend.AI variant.
    #[clap(long, default_value = "default")]
    caller: String,
    #[clap(long, default_value = "GET")]
    method: String,
    #[clap(long)]
    path: String,
    /// RFC 3339 timestamp to sign with instead of the current time.
    #[clap(long)]
    timestamp: Option<DateTime<Utc>>,
    /// Print only the Authorization/signature mapping.
    #[clap(long)]
    signature_only: bool,
    #[command(flatten)]
    signer: SignerArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args
        .signer
        .into_config()
        .context("loading signer configuration")?;
    let caller = CallerContext::from_caller_id(&args.caller);
    let now = args.timestamp.unwrap_or_else(Utc::now);

    let output = if args.signature_only {
        let variant = config.for_context(caller)?;
        let request = SignatureRequest::new(&args.method, &args.path, now);
        let result = sign(&request, variant).context("signing request")?;
        serde_json::to_value(result).context("serializing signature")?
    } else {
        HeaderBuilder::new(&config)
            .generate_common_headers(caller, &args.method, &args.path, now)
            .context("building request headers")?
            .to_json()
    };

    info!(%caller, method = %args.method, path = %args.path, "signed request");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
