// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

use axum::{extract::State, Json};

use crate::{state::AppState, store::SubmittedTransaction};

/// Submitted transactions, newest first. In-memory only; restarts forget
/// history the explorer still remembers.
#[utoipa::path(
    get,
    path = "/v1/transactions",
    tag = "Transactions",
    responses((status = 200, body = [SubmittedTransaction]))
)]
pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<SubmittedTransaction>> {
    Json(state.pending.read().await.list())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::RelayConfig;
    use crate::store::RelayAction;
    use crate::wallet::testing::MockBoundary;

    #[tokio::test]
    async fn history_lists_recorded_submissions() {
        let state = AppState::new(RelayConfig::default(), Arc::new(MockBoundary::new()));
        state.pending.write().await.record_submission(
            RelayAction::InitializeProfile,
            "at1abc",
            "https://explorer.aleo.org/transaction/at1abc",
        );

        let Json(transactions) = list_transactions(State(state)).await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].tx_id, "at1abc");
    }
}
