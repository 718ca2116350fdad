//! `clicktrack serve`

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use clicktrack_config::ClickTrackConfig;
use clicktrack_gateway::{start_server, ClickLedger, GatewayState};
use tracing::info;

pub async fn run(config: &ClickTrackConfig, port: Option<u16>, articles: Option<&Path>) -> Result<()> {
    let ledger = ClickLedger::new();
    if let Some(path) = articles {
        ledger.load_seed(path).await?;
    }

    let ip: IpAddr = config
        .gateway
        .bind
        .parse()
        .with_context(|| format!("Invalid gateway.bind address: {}", config.gateway.bind))?;
    let addr = SocketAddr::new(ip, port.unwrap_or(config.gateway.port));

    info!(
        addr = %addr,
        click_path = %config.gateway.click_path,
        "Starting click gateway"
    );
    start_server(
        addr,
        GatewayState::from_config(config, ledger),
        &config.gateway.click_path,
    )
    .await
}
