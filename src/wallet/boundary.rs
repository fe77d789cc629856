// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! The wallet adapter boundary.
//!
//! Everything this service does ultimately goes through the four adapter
//! operations below. The adapter's error shapes (named errors plus free-form
//! messages) are mapped into the closed [`WalletError`] taxonomy here, at the
//! boundary, so no downstream code ever pattern-matches on message text.

use async_trait::async_trait;
use serde_json::Value;

use super::transactions::TransactionRequest;
use super::types::{EncryptedRecord, TxStatus, WalletSession};

/// Closed error taxonomy for wallet boundary failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// Wallet extension absent, locked, or missing a capability.
    #[error("Wallet is not connected or not ready")]
    NotReady,

    /// Transport-level failure reaching the adapter.
    #[error("Could not reach the wallet adapter: {0}")]
    Connection(String),

    /// The user declined a decryption or record-access prompt. Expected and
    /// frequent; callers log it instead of surfacing it.
    #[error("Decryption permission was not granted")]
    PermissionDenied,

    /// The adapter could not produce the requested records.
    #[error("Record access failed: {0}")]
    RecordAccess(String),

    /// Submission rejected for insufficient public balance.
    #[error("Insufficient balance to cover the transaction fee")]
    InsufficientBalance,

    /// Submission rejected because an input record was already consumed.
    #[error("Input record has already been spent")]
    RecordSpent,

    /// A record failed validation before or during submission.
    #[error("Invalid record: {0}")]
    RecordInvalid(String),

    /// Any other rejection; carries the adapter's raw message.
    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

/// Map an adapter-reported error (name plus message) into the closed
/// taxonomy.
///
/// The adapter reports errors the way the wallet extension does: a named
/// error class and a human-readable message. The known signatures are
/// matched here once; everything unmatched becomes [`WalletError::Rejected`]
/// with the raw message preserved for the fallback surface.
pub fn classify_rejection(name: Option<&str>, message: &str) -> WalletError {
    let lower = message.to_ascii_lowercase();

    if name == Some("WalletRecordsError") || is_permission_message(&lower) {
        return WalletError::PermissionDenied;
    }
    if name == Some("WalletNotConnectedError") || lower.contains("not connected") {
        return WalletError::NotReady;
    }
    if lower.contains("insufficient") && lower.contains("balance") {
        return WalletError::InsufficientBalance;
    }
    if lower.contains("already been spent") || lower.contains("record is spent") {
        return WalletError::RecordSpent;
    }
    if lower.contains("invalid record") {
        return WalletError::RecordInvalid(message.to_string());
    }

    WalletError::Rejected(message.to_string())
}

/// The extension phrases refusals as "permission not granted" with minor
/// variations, so match on the two stable words.
fn is_permission_message(lower: &str) -> bool {
    let granted = lower
        .find("granted")
        .map(|idx| lower[..idx].contains("not"))
        .unwrap_or(false);
    lower.contains("permission") && granted || lower.contains("not granted")
}

/// Asynchronous request/response interface to the wallet adapter.
///
/// There is no server push and no cancellation: once a transaction request
/// is handed to the adapter it cannot be aborted from here. Implementations
/// are [`HttpWalletBoundary`](super::http::HttpWalletBoundary) in production
/// and a mock in tests.
#[async_trait]
pub trait WalletBoundary: Send + Sync {
    /// Observe the adapter's current connection state.
    async fn session(&self) -> Result<WalletSession, WalletError>;

    /// Submit a transaction request; returns the opaque transaction ID.
    async fn submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<String, WalletError>;

    /// List encrypted records for a program. `None` means the adapter has
    /// no records for the program (distinct from an error).
    async fn request_records(
        &self,
        program_id: &str,
    ) -> Result<Option<Vec<EncryptedRecord>>, WalletError>;

    /// Reveal record plaintexts for a program. Raises a user-facing
    /// permission prompt; refusal surfaces as
    /// [`WalletError::PermissionDenied`].
    async fn request_record_plaintexts(&self, program_id: &str)
        -> Result<Vec<Value>, WalletError>;

    /// Look up the status of a previously submitted transaction.
    async fn transaction_status(&self, tx_id: &str) -> Result<TxStatus, WalletError>;
}
