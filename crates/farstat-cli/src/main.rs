//! farstat CLI
//!
//! Prompts for filesystem paths on standard input, sends each one as a
//! stat request to a remote endpoint over the message bus, and renders
//! whatever responses eventually arrive to stdout or an output file. The
//! endpoint may be offline; the bus delivers when it can.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use farstat::bus::{self, FramedBus};
use farstat::{ClientId, Config, RequestIssuer, ResponseListener, Sink};

/// farstat - interactively stat paths on a remote endpoint
#[derive(Parser, Debug)]
#[command(name = "farstat")]
#[command(about = "Interactively stat paths on a remote endpoint over a message bus")]
struct Args {
    /// Id of the client to send the requests to, as a hex string
    #[arg(long)]
    client_id: String,

    /// File to append rendered responses to (empty means stdout)
    #[arg(long, default_value = "")]
    output: String,

    /// Address of the message bus endpoint
    #[arg(long, default_value = "[::1]:6061")]
    bus: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    // A malformed client id fails here, before the bus is even dialed.
    let config = Config {
        client_id: ClientId::from_hex(&args.client_id).context("invalid --client-id")?,
        sink: Sink::from_output_arg(&args.output),
    };

    let (sender, inbound) = FramedBus::connect(args.bus)
        .await
        .with_context(|| format!("failed to reach the message bus at {}", args.bus))?;
    tracing::info!("connected to message bus at {}", args.bus);

    // Register the inbound listener before the first prompt.
    let listener = ResponseListener::new(config.sink.clone());
    tokio::spawn(async move {
        if let Err(e) = bus::run_dispatch(inbound, listener).await {
            tracing::error!("inbound dispatch stopped: {}", e);
        }
    });

    let issuer = RequestIssuer::new(Arc::new(sender), config.client_id.clone());
    issuer
        .run(tokio::io::BufReader::new(tokio::io::stdin()))
        .await?;

    tracing::info!("input closed, shutting down");
    Ok(())
}
