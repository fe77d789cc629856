// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::RelayConfig;
use crate::error::ApiError;
use crate::store::{PendingStore, RelayAction};
use crate::wallet::{RecordCache, WalletBoundary};

/// One in-flight latch per mutating action.
///
/// The latch is checked and set synchronously, before the first suspension
/// point of a handler, so a double-submit is rejected immediately instead
/// of queueing a second wallet prompt. The guard releases on drop, which
/// covers every exit path.
#[derive(Debug, Default)]
pub struct ActionLatches {
    initialize: AtomicBool,
    apply: AtomicBool,
    payment: AtomicBool,
}

impl ActionLatches {
    fn flag(&self, action: RelayAction) -> &AtomicBool {
        match action {
            RelayAction::InitializeProfile => &self.initialize,
            RelayAction::ApplyForLoan => &self.apply,
            RelayAction::MakePayment => &self.payment,
        }
    }
}

/// RAII latch hold; dropping it re-opens the action.
#[derive(Debug)]
pub struct LatchGuard {
    latches: Arc<ActionLatches>,
    action: RelayAction,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.latches.flag(self.action).store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub boundary: Arc<dyn WalletBoundary>,
    pub records: Arc<Mutex<RecordCache>>,
    pub pending: Arc<RwLock<PendingStore>>,
    latches: Arc<ActionLatches>,
}

impl AppState {
    pub fn new(config: RelayConfig, boundary: Arc<dyn WalletBoundary>) -> Self {
        Self {
            config: Arc::new(config),
            boundary,
            records: Arc::new(Mutex::new(RecordCache::new())),
            pending: Arc::new(RwLock::new(PendingStore::new())),
            latches: Arc::new(ActionLatches::default()),
        }
    }

    /// Take the in-flight latch for a mutating action, or reject with 409
    /// if an identical action is already running.
    pub fn acquire_latch(&self, action: RelayAction) -> Result<LatchGuard, ApiError> {
        let flag = self.latches.flag(action);
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ApiError::conflict(format!(
                "A {} is already in progress. Wait for it to finish.",
                action.describe()
            )));
        }
        Ok(LatchGuard {
            latches: self.latches.clone(),
            action,
        })
    }

    /// Clear the record cache after a delay, off the request path. Used
    /// when a submission fails on a spent record: the ledger needs a
    /// moment before a refetch sees the replacement record.
    pub fn schedule_record_refresh(&self, delay: Duration) {
        let records = self.records.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            records.lock().await.clear();
            info!("record cache cleared after spent-record rejection");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::MockBoundary;

    fn state() -> AppState {
        AppState::new(RelayConfig::default(), Arc::new(MockBoundary::new()))
    }

    #[tokio::test]
    async fn latch_rejects_overlapping_acquisition() {
        let state = state();
        let guard = state.acquire_latch(RelayAction::ApplyForLoan).unwrap();

        let err = state.acquire_latch(RelayAction::ApplyForLoan).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);

        // A different action is not blocked.
        let _other = state.acquire_latch(RelayAction::MakePayment).unwrap();

        drop(guard);
        assert!(state.acquire_latch(RelayAction::ApplyForLoan).is_ok());
    }

    #[tokio::test]
    async fn latch_releases_on_early_return_paths() {
        let state = state();
        {
            let _guard = state.acquire_latch(RelayAction::InitializeProfile).unwrap();
            // Simulated validation failure: guard drops with the scope.
        }
        assert!(state.acquire_latch(RelayAction::InitializeProfile).is_ok());
    }
}
