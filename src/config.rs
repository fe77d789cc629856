// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names, default values, and
//! protocol constants used throughout the application. Configuration is
//! loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CREDIT_PROGRAM` | Deployed credit profile program ID | `credit_score.aleo` |
//! | `LOAN_PROGRAM` | Deployed loan manager program ID | `loan_managerv1.aleo` |
//! | `ALEO_NETWORK` | Target network (`testnet` or `mainnet`) | `testnet` |
//! | `ALEO_API_URL` | Aleo node/explorer API base URL | `https://api.explorer.provable.com/v1` |
//! | `EXPLORER_URL` | Block explorer base URL for display links | `https://explorer.aleo.org` |
//! | `WALLET_ADAPTER_URL` | Wallet adapter boundary base URL | `http://127.0.0.1:9100` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

/// Environment variable name for the credit profile program ID.
pub const CREDIT_PROGRAM_ENV: &str = "CREDIT_PROGRAM";

/// Environment variable name for the loan manager program ID.
pub const LOAN_PROGRAM_ENV: &str = "LOAN_PROGRAM";

/// Environment variable name for the target Aleo network.
pub const ALEO_NETWORK_ENV: &str = "ALEO_NETWORK";

/// Environment variable name for the Aleo API base URL.
pub const ALEO_API_URL_ENV: &str = "ALEO_API_URL";

/// Environment variable name for the block explorer base URL.
pub const EXPLORER_URL_ENV: &str = "EXPLORER_URL";

/// Environment variable name for the wallet adapter base URL.
pub const WALLET_ADAPTER_URL_ENV: &str = "WALLET_ADAPTER_URL";

/// Default credit profile program deployed on testnet.
pub const DEFAULT_CREDIT_PROGRAM: &str = "credit_score.aleo";

/// Default loan manager program deployed on testnet.
pub const DEFAULT_LOAN_PROGRAM: &str = "loan_managerv1.aleo";

/// Default wallet adapter endpoint (local adapter daemon).
pub const DEFAULT_WALLET_ADAPTER_URL: &str = "http://127.0.0.1:9100";

/// Base-unit scale factor: one credit equals one million microcredits.
///
/// This is a protocol constant. Every amount crossing the wallet boundary
/// is an integer number of microcredits, so all conversions go through
/// [`crate::wallet::MicroCredits`] rather than multiplying inline.
pub const MICROCREDITS_PER_CREDIT: u64 = 1_000_000;

/// How long a fetched record list stays valid before the wallet adapter is
/// asked again. Each fetch may raise a user-facing prompt, so the window
/// exists to prevent prompt storms, not to bound staleness.
pub const RECORD_CACHE_WINDOW: Duration = Duration::from_secs(30);

/// Advisory ceiling on how long the poller keeps asking about a submitted
/// transaction. The submission itself cannot be cancelled.
pub const TX_TIMEOUT: Duration = Duration::from_secs(60);

/// Interval between transaction status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Assumed seconds per block, used to approximate the current block height
/// from wall-clock time. See [`crate::wallet::approximate_block_height`].
pub const BLOCK_INTERVAL_SECS: u64 = 20;

/// Fee in microcredits for the `initialize_credit` transition.
pub const INITIALIZE_FEE: u64 = 100_000;

/// Fee in microcredits for `apply_for_loan` and `make_payment`.
pub const LOAN_ACTION_FEE: u64 = 200_000;

/// Delay before the record cache is cleared after a spent-record rejection,
/// giving the ledger time to reflect the conflicting transaction.
pub const SPENT_RECORD_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// Runtime configuration resolved from the environment with fallbacks.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Credit profile program ID (e.g. `credit_score.aleo`).
    pub credit_program: String,
    /// Loan manager program ID (e.g. `loan_managerv1.aleo`).
    pub loan_program: String,
    /// Network selector (`testnet` or `mainnet`).
    pub network: String,
    /// Aleo API base URL.
    pub api_url: String,
    /// Block explorer base URL for display links.
    pub explorer_url: String,
    /// Wallet adapter boundary base URL.
    pub wallet_adapter_url: String,
}

impl RelayConfig {
    /// Load configuration from the environment, falling back to the
    /// hard-coded testnet defaults for anything unset.
    pub fn from_env() -> Self {
        let network = crate::wallet::resolve_network(env::var(ALEO_NETWORK_ENV).ok().as_deref());
        Self {
            credit_program: env::var(CREDIT_PROGRAM_ENV)
                .unwrap_or_else(|_| DEFAULT_CREDIT_PROGRAM.to_string()),
            loan_program: env::var(LOAN_PROGRAM_ENV)
                .unwrap_or_else(|_| DEFAULT_LOAN_PROGRAM.to_string()),
            api_url: env::var(ALEO_API_URL_ENV).unwrap_or_else(|_| network.api_url.to_string()),
            explorer_url: env::var(EXPLORER_URL_ENV)
                .unwrap_or_else(|_| network.explorer_url.to_string()),
            wallet_adapter_url: env::var(WALLET_ADAPTER_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_WALLET_ADAPTER_URL.to_string()),
            network: network.name.to_string(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        let network = crate::wallet::ALEO_TESTNET;
        Self {
            credit_program: DEFAULT_CREDIT_PROGRAM.to_string(),
            loan_program: DEFAULT_LOAN_PROGRAM.to_string(),
            network: network.name.to_string(),
            api_url: network.api_url.to_string(),
            explorer_url: network.explorer_url.to_string(),
            wallet_adapter_url: DEFAULT_WALLET_ADAPTER_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_testnet_programs() {
        let config = RelayConfig::default();
        assert_eq!(config.credit_program, "credit_score.aleo");
        assert_eq!(config.loan_program, "loan_managerv1.aleo");
        assert_eq!(config.network, "testnet");
        assert!(config.explorer_url.starts_with("https://"));
    }

    #[test]
    fn scale_factor_is_one_million() {
        assert_eq!(MICROCREDITS_PER_CREDIT, 1_000_000);
    }
}
