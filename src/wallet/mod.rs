// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Wallet relay core.
//!
//! This module provides functionality for:
//! - The wallet adapter boundary trait and its HTTP implementation
//! - Time-boxed record caching and record selection
//! - Transaction shaping for the credit and loan programs
//! - Permission-gated record decryption

pub mod boundary;
pub mod decrypt;
pub mod http;
pub mod records;
pub mod transactions;
pub mod types;

pub use boundary::{classify_rejection, WalletBoundary, WalletError};
pub use decrypt::{decrypt_loan, decrypt_profile, request_decryption, DecryptedLoan, DecryptedProfile};
pub use http::HttpWalletBoundary;
pub use records::{active_loans, cached_records, choose_record, Clock, RecordCache, RecordChoice, SystemClock};
pub use transactions::{
    approximate_block_height, build_apply_for_loan, build_initialize_profile, build_make_payment,
    format_credits, parse_credits, unix_now, AmountError, LoanTerms, MicroCredits,
    TransactionRequest, TransitionInput,
};
pub use types::{
    resolve_network, transaction_url, EncryptedRecord, NetworkConfig, TxStatus, WalletSession,
    ALEO_MAINNET, ALEO_TESTNET,
};

/// Shared mock boundary for unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::boundary::{WalletBoundary, WalletError};
    use super::transactions::TransactionRequest;
    use super::types::{EncryptedRecord, TxStatus, WalletSession};

    /// Configurable in-memory wallet adapter.
    #[derive(Default)]
    pub struct MockBoundary {
        session: Option<WalletSession>,
        records: Option<Vec<EncryptedRecord>>,
        plaintexts: Vec<Value>,
        records_error: Option<WalletError>,
        plaintexts_error: Option<WalletError>,
        submit_error: Option<WalletError>,
        status: Option<TxStatus>,
        record_calls: AtomicUsize,
        plaintext_calls: AtomicUsize,
        submit_calls: AtomicUsize,
        pub submitted: Mutex<Vec<TransactionRequest>>,
    }

    impl MockBoundary {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_session(mut self, session: WalletSession) -> Self {
            self.session = Some(session);
            self
        }

        pub fn with_records(mut self, records: Vec<EncryptedRecord>) -> Self {
            self.records = Some(records);
            self
        }

        pub fn with_plaintexts(mut self, plaintexts: Vec<Value>) -> Self {
            self.plaintexts = plaintexts;
            self
        }

        pub fn failing_records(mut self) -> Self {
            self.records_error = Some(WalletError::Connection("adapter unreachable".into()));
            self
        }

        pub fn denying_plaintexts(mut self) -> Self {
            self.plaintexts_error = Some(WalletError::PermissionDenied);
            self
        }

        pub fn rejecting_submissions(mut self, error: WalletError) -> Self {
            self.submit_error = Some(error);
            self
        }

        pub fn with_status(mut self, status: TxStatus) -> Self {
            self.status = Some(status);
            self
        }

        pub fn record_calls(&self) -> usize {
            self.record_calls.load(Ordering::SeqCst)
        }

        pub fn plaintext_calls(&self) -> usize {
            self.plaintext_calls.load(Ordering::SeqCst)
        }

        pub fn submit_calls(&self) -> usize {
            self.submit_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WalletBoundary for MockBoundary {
        async fn session(&self) -> Result<WalletSession, WalletError> {
            Ok(self.session.clone().unwrap_or(WalletSession {
                connected: true,
                address: Some("aleo1owner".to_string()),
                can_submit: true,
                can_list_records: true,
                can_list_plaintexts: true,
            }))
        }

        async fn submit_transaction(
            &self,
            request: &TransactionRequest,
        ) -> Result<String, WalletError> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.submit_error {
                return Err(err.clone());
            }
            self.submitted.lock().unwrap().push(request.clone());
            Ok(format!("at1mock{}", self.submit_calls()))
        }

        async fn request_records(
            &self,
            _program_id: &str,
        ) -> Result<Option<Vec<EncryptedRecord>>, WalletError> {
            self.record_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.records_error {
                return Err(err.clone());
            }
            Ok(self.records.clone())
        }

        async fn request_record_plaintexts(
            &self,
            _program_id: &str,
        ) -> Result<Vec<Value>, WalletError> {
            self.plaintext_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.plaintexts_error {
                return Err(err.clone());
            }
            Ok(self.plaintexts.clone())
        }

        async fn transaction_status(&self, _tx_id: &str) -> Result<TxStatus, WalletError> {
            Ok(self.status.unwrap_or(TxStatus::Pending))
        }
    }
}
