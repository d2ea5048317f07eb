mod cli;
mod error;
mod mdns;

use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use shared::types::ServiceRecord;
use crate::cli::Args;
use crate::mdns::announcer::Announcer;
use crate::mdns::transport::MdnsTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("specsserver_announcerd=info")
            }),
        )
        .init();

    tracing::info!("Starting specsserver-announcerd");

    let args = Args::parse();

    let address = match args.ip {
        Some(ip) => ip,
        None => {
            let detected = detect_local_ipv4();
            tracing::info!("No --ip given, auto-detected local address {}", detected);
            detected
        }
    };

    let record = ServiceRecord::new(&args.name, address, args.port)
        .context("Invalid announcement parameters")?;

    let transport = MdnsTransport::new()?;
    let mut announcer = Announcer::new(transport, record.clone());

    // Fatal on conflict: the state machine never enters Announcing and the
    // process exits non-zero through the anyhow chain.
    announcer.start().with_context(|| {
        format!(
            "Failed to announce {} -> {}:{}",
            record.hostname, record.address, record.port
        )
    })?;

    tracing::info!("Advertisement active, Ctrl-C to stop");

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    announcer.run_until_cancelled(cancel).await;
    tracing::debug!("Announcer finished in {:?} state", announcer.state());

    // Shutdown mDNS daemon
    let transport = announcer.into_transport();
    if let Err(e) = transport.shutdown() {
        tracing::error!("Failed to shut down mDNS daemon: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Primary IPv4 of this machine, per the routing table; localhost when
/// nothing better is known.
fn detect_local_ipv4() -> Ipv4Addr {
    match local_ip_address::local_ip() {
        Ok(IpAddr::V4(addr)) => addr,
        _ => Ipv4Addr::LOCALHOST,
    }
}
