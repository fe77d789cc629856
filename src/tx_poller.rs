// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! # Transaction Status Poller
//!
//! Background task that chases submitted transactions until they reach a
//! terminal state. Submissions cannot be cancelled once handed to the
//! wallet adapter; polling is purely observational.
//!
//! ## Strategy
//!
//! Every `poll_interval` (default 2 s) the poller:
//! 1. Lists pending submissions from the in-memory store.
//! 2. Asks the wallet adapter for each one's status.
//! 3. Marks entries finalized/failed, and clears the record cache on
//!    finalization so the next dashboard read observes fresh records.
//! 4. Gives up on entries older than the advisory `TX_TIMEOUT`, marking
//!    them unknown rather than polling forever.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{POLL_INTERVAL, TX_TIMEOUT};
use crate::state::AppState;
use crate::wallet::TxStatus;

/// Background poller for submitted transaction statuses.
pub struct TxPoller {
    state: AppState,
    poll_interval: Duration,
    timeout: Duration,
}

impl TxPoller {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            poll_interval: POLL_INTERVAL,
            timeout: TX_TIMEOUT,
        }
    }

    /// Run the poll loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(poller.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "transaction status poller started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("transaction status poller shutting down");
                    return;
                }
                _ = tokio::time::sleep(self.poll_interval) => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// One polling sweep over the pending submissions.
    pub async fn sweep_once(&self) {
        let pending: Vec<_> = {
            let store = self.state.pending.read().await;
            store
                .non_terminal()
                .into_iter()
                .filter(|entry| entry.status == TxStatus::Pending)
                .collect()
        };

        for entry in pending {
            let age = (chrono::Utc::now() - entry.submitted_at)
                .to_std()
                .unwrap_or_default();
            if age > self.timeout {
                warn!(tx_id = %entry.tx_id, "giving up on transaction after advisory timeout");
                self.state
                    .pending
                    .write()
                    .await
                    .set_status(&entry.id, TxStatus::Unknown);
                continue;
            }

            match self.state.boundary.transaction_status(&entry.tx_id).await {
                Ok(status) => {
                    if status != entry.status {
                        info!(tx_id = %entry.tx_id, ?status, "transaction status changed");
                        self.state
                            .pending
                            .write()
                            .await
                            .set_status(&entry.id, status);
                    }
                    if status == TxStatus::Finalized {
                        // New records exist on the ledger now.
                        self.state.records.lock().await.clear();
                    }
                }
                Err(err) => {
                    warn!(tx_id = %entry.tx_id, error = %err, "status poll failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::RelayConfig;
    use crate::store::RelayAction;
    use crate::wallet::testing::MockBoundary;
    use crate::wallet::EncryptedRecord;

    fn record() -> EncryptedRecord {
        EncryptedRecord {
            id: "rec1".into(),
            owner: "aleo1owner".into(),
            spent: Some(false),
            program_id: None,
            ciphertext: None,
        }
    }

    #[tokio::test]
    async fn finalized_transactions_clear_the_record_cache() {
        let boundary = Arc::new(MockBoundary::new().with_status(TxStatus::Finalized));
        let state = AppState::new(RelayConfig::default(), boundary);

        state
            .records
            .lock()
            .await
            .put("aleo1owner", "credit_score.aleo", Some(vec![record()]));
        let entry = state.pending.write().await.record_submission(
            RelayAction::InitializeProfile,
            "at1abc",
            "url",
        );

        TxPoller::new(state.clone()).sweep_once().await;

        let listed = state.pending.read().await.list();
        assert_eq!(listed[0].id, entry.id);
        assert_eq!(listed[0].status, TxStatus::Finalized);
        assert!(state
            .records
            .lock()
            .await
            .get("aleo1owner", "credit_score.aleo")
            .is_none());
    }

    #[tokio::test]
    async fn pending_transactions_stay_tracked() {
        let boundary = Arc::new(MockBoundary::new().with_status(TxStatus::Pending));
        let state = AppState::new(RelayConfig::default(), boundary);
        state.pending.write().await.record_submission(
            RelayAction::MakePayment,
            "at1abc",
            "url",
        );

        TxPoller::new(state.clone()).sweep_once().await;
        assert_eq!(state.pending.read().await.list()[0].status, TxStatus::Pending);
    }

    #[tokio::test]
    async fn stale_transactions_are_marked_unknown() {
        let boundary = Arc::new(MockBoundary::new().with_status(TxStatus::Pending));
        let state = AppState::new(RelayConfig::default(), boundary);
        state.pending.write().await.record_submission(
            RelayAction::ApplyForLoan,
            "at1abc",
            "url",
        );

        let poller = TxPoller {
            state: state.clone(),
            poll_interval: POLL_INTERVAL,
            timeout: Duration::ZERO,
        };
        poller.sweep_once().await;
        assert_eq!(state.pending.read().await.list()[0].status, TxStatus::Unknown);
    }
}
