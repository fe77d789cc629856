// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Wallet boundary types and network constants.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aleo network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Node/explorer API base URL
    pub api_url: &'static str,
    /// Block explorer URL for display links
    pub explorer_url: &'static str,
}

/// Aleo testnet (testnet beta) configuration.
pub const ALEO_TESTNET: NetworkConfig = NetworkConfig {
    name: "testnet",
    api_url: "https://api.explorer.provable.com/v1",
    explorer_url: "https://explorer.aleo.org",
};

/// Aleo mainnet configuration.
pub const ALEO_MAINNET: NetworkConfig = NetworkConfig {
    name: "mainnet",
    api_url: "https://api.explorer.provable.com/v1",
    explorer_url: "https://explorer.aleo.org",
};

/// Resolve a network selector to its configuration.
///
/// Unknown or missing selectors fall back to testnet, which is where the
/// credit programs are deployed.
pub fn resolve_network(raw: Option<&str>) -> &'static NetworkConfig {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("mainnet") => &ALEO_MAINNET,
        _ => &ALEO_TESTNET,
    }
}

/// Explorer link for a transaction. Display-only; nothing parses the page
/// behind it.
pub fn transaction_url(explorer_base: &str, tx_id: &str) -> String {
    format!("{}/transaction/{}", explorer_base.trim_end_matches('/'), tx_id)
}

/// Snapshot of the wallet adapter's connection state.
///
/// The session is owned by the adapter; this service only observes it. The
/// capability flags mirror which adapter operations are available for the
/// connected wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletSession {
    /// Whether a wallet is currently connected.
    pub connected: bool,
    /// Public address of the connected account, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Whether the adapter can submit transactions.
    #[serde(default)]
    pub can_submit: bool,
    /// Whether the adapter can list encrypted records.
    #[serde(default)]
    pub can_list_records: bool,
    /// Whether the adapter can reveal record plaintexts.
    #[serde(default)]
    pub can_list_plaintexts: bool,
}

impl WalletSession {
    /// A disconnected session with no capabilities.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            address: None,
            can_submit: false,
            can_list_records: false,
            can_list_plaintexts: false,
        }
    }
}

/// An encrypted, owner-scoped state object on the ledger.
///
/// Records are consumable exactly once per transition. The `spent` flag may
/// be absent in adapter responses; selection treats absent as unspent (see
/// [`super::records::choose_record`]).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EncryptedRecord {
    /// Opaque record identifier.
    pub id: String,
    /// Owner address.
    pub owner: String,
    /// Whether the record has been consumed by a transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<bool>,
    /// Program that produced the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    /// Opaque ciphertext payload. Never interpreted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<String>,
}

impl EncryptedRecord {
    /// Whether the record is known or assumed unspent.
    pub fn is_unspent(&self) -> bool {
        !matches!(self.spent, Some(true))
    }
}

/// Status of a submitted transaction as reported by the wallet adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Accepted by the adapter, not yet on the ledger.
    Pending,
    /// Included and finalized on the ledger.
    Finalized,
    /// Rejected by the network or the adapter.
    Failed,
    /// The adapter no longer knows the transaction.
    Unknown,
}

impl TxStatus {
    /// Whether the transaction has reached a state the poller can stop at.
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Finalized | TxStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_network_defaults_to_testnet() {
        assert_eq!(resolve_network(None).name, "testnet");
        assert_eq!(resolve_network(Some("bogus")).name, "testnet");
        assert_eq!(resolve_network(Some(" Mainnet ")).name, "mainnet");
    }

    #[test]
    fn explorer_links_are_templated() {
        assert_eq!(
            transaction_url("https://explorer.aleo.org/", "at1abc"),
            "https://explorer.aleo.org/transaction/at1abc"
        );
        assert_eq!(
            transaction_url(ALEO_TESTNET.explorer_url, "at1abc"),
            "https://explorer.aleo.org/transaction/at1abc"
        );
    }

    #[test]
    fn absent_spent_flag_counts_as_unspent() {
        let record = EncryptedRecord {
            id: "rec1".into(),
            owner: "aleo1owner".into(),
            spent: None,
            program_id: None,
            ciphertext: None,
        };
        assert!(record.is_unspent());
    }
}
