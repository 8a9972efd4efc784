//! stubdns - An asynchronous stub DNS resolver in Rust
//!
//! Resolves hostnames given on the command line by querying a single
//! upstream DNS server over UDP, all lookups running concurrently.

use std::process::ExitCode;
use stubdns::cli;
use stubdns::config::Config;
use stubdns::dns::RecordType;
use stubdns::resolver::Resolver;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let Some(args) = cli::parse_args() else {
        return Ok(ExitCode::SUCCESS);
    };

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("stubdns {}", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing file only falls back to defaults when
    // no path was given explicitly.
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(server) = &args.server {
        config.server = server
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid server address {}: {}", server, e))?;
    }

    let qtype = if args.ipv6 {
        RecordType::AAAA
    } else {
        RecordType::A
    };
    let resolver = Resolver::new(config)?;

    // Fan out all lookups at once; admission control bounds the sockets.
    let handles: Vec<_> = args
        .hostnames
        .iter()
        .map(|hostname| (hostname.clone(), resolver.spawn(hostname, qtype)))
        .collect();

    let mut failures = 0;
    for (hostname, handle) in handles {
        match handle.outcome().await {
            Ok(response) => {
                if response.answers.is_empty() {
                    println!("{}: no answer ({})", hostname, response.rcode);
                } else {
                    for answer in &response.answers {
                        println!("{}", answer);
                    }
                }
            }
            Err(e) => {
                error!(hostname = %hostname, error = %e, "lookup failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
