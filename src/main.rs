//! Minting console (v1)
//!
//! A terminal front end for the wallet-connected minting flow.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────┐
//!                  │                 MINTING CLIENT                  │
//!                  │                                                 │
//!   CLI action     │  ┌─────────────┐      ┌──────────────────────┐ │
//!   ─────────────▶ │  │ coordinator │─────▶│ session (authorize,  │ │
//!                  │  │  (flow)     │      │ network check)       │ │
//!                  │  └──────┬──────┘      └──────────┬───────────┘ │
//!                  │         │                        │             │
//!                  │         ▼                        ▼             │
//!                  │  ┌─────────────┐      ┌──────────────────────┐ │
//!                  │  │  contract   │      │  provider gateways   │ │
//!                  │  │ (mint/read/ │─────▶│  (wallet + node      │ │
//!                  │  │  events)    │      │   JSON-RPC)          │ │
//!                  │  └─────────────┘      └──────────────────────┘ │
//!                  │                                                 │
//!                  │  Cross-cutting: config, validation, tracing     │
//!                  └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mintflow::config::{load_config, ClientConfig};
use mintflow::coordinator::{FlowState, MintCoordinator, Notice};
use mintflow::provider::{detect_wallet_gateway, HttpGateway, ProviderGateway};
use mintflow::session::NetworkStatus;

#[derive(Parser)]
#[command(name = "mintflow")]
#[command(about = "Wallet-connected minting console", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "mintflow.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current account and minted count
    Status,
    /// Authorize a wallet account
    Connect,
    /// Connect if needed, then mint one token
    Mint,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mintflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        tracing::info!(path = %cli.config.display(), "config file not found, using defaults");
        ClientConfig::default()
    };

    let request_timeout = Duration::from_secs(config.rpc.request_timeout_secs);
    let wallet_gateway = detect_wallet_gateway(&config.wallet, request_timeout);
    let node_gateway: Arc<dyn ProviderGateway> =
        Arc::new(HttpGateway::new(config.rpc.url.clone(), request_timeout));

    tracing::info!(
        contract = %config.contract.address,
        node = %config.rpc.url,
        wallet_configured = wallet_gateway.is_available(),
        "minting client starting"
    );

    let (coordinator, mut notice_stream) =
        MintCoordinator::new(&config, wallet_gateway, node_gateway)?;

    coordinator.initialize().await;

    match cli.command {
        Commands::Status => {
            print_state(&coordinator.state());
        }
        Commands::Connect => {
            for notice in coordinator.connect().await {
                println!("{notice}");
            }
            print_state(&coordinator.state());
        }
        Commands::Mint => {
            if !coordinator.state().is_connected() {
                let notices = coordinator.connect().await;
                let connected = coordinator.state().is_connected();
                for notice in notices {
                    println!("{notice}");
                }
                if !connected {
                    return Ok(());
                }
            }

            for notice in coordinator.mint().await {
                println!("{notice}");
            }

            // Anything the event subscription picked up in the meantime.
            while let Ok(notice) = notice_stream.try_recv() {
                println!("{notice}");
            }

            print_state(&coordinator.state());
        }
    }

    Ok(())
}

fn print_state(state: &FlowState) {
    if state.current_account.is_empty() {
        println!("wallet:  not connected");
    } else {
        println!("wallet:  {}", state.current_account);
    }
    if let Some(NetworkStatus::Mismatch { actual }) = &state.network {
        println!("network: {actual} (wrong chain)");
    }
    println!("minted:  {}/{}", state.minted_count, state.total_supply);
}
