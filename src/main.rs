// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

mod api;
mod config;
mod credit;
mod error;
mod models;
mod state;
mod store;
mod tx_poller;
mod wallet;

#[cfg(not(test))]
use std::{env, net::SocketAddr, sync::Arc};

#[cfg(not(test))]
use api::router;
#[cfg(not(test))]
use config::RelayConfig;
#[cfg(not(test))]
use state::AppState;
#[cfg(not(test))]
use tokio_util::sync::CancellationToken;
#[cfg(not(test))]
use tracing_subscriber::EnvFilter;
#[cfg(not(test))]
use tx_poller::TxPoller;
#[cfg(not(test))]
use wallet::HttpWalletBoundary;

#[cfg(not(test))]
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    init_tracing();

    let config = RelayConfig::from_env();
    tracing::info!(
        network = %config.network,
        credit_program = %config.credit_program,
        loan_program = %config.loan_program,
        "loaded relay configuration"
    );

    let boundary = HttpWalletBoundary::new(config.wallet_adapter_url.clone())
        .expect("Invalid WALLET_ADAPTER_URL");
    let state = AppState::new(config, Arc::new(boundary));

    // Background transaction status poller with graceful shutdown.
    let shutdown = CancellationToken::new();
    let poller = TxPoller::new(state.clone());
    let poller_handle = tokio::spawn(poller.run(shutdown.clone()));

    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Zkredit relay listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("HTTP server failed");

    shutdown.cancel();
    let _ = poller_handle.await;
}
