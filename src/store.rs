// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! In-memory log of submitted transactions.
//!
//! The ledger is the source of truth; this store only backs the dashboard's
//! transaction history view and the status poller. Nothing here survives a
//! restart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::wallet::TxStatus;

/// The three user intents this service relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelayAction {
    InitializeProfile,
    ApplyForLoan,
    MakePayment,
}

impl RelayAction {
    /// Human-readable name for conflict messages.
    pub fn describe(self) -> &'static str {
        match self {
            RelayAction::InitializeProfile => "profile initialization",
            RelayAction::ApplyForLoan => "loan application",
            RelayAction::MakePayment => "payment",
        }
    }
}

/// A submission tracked by the poller and shown in the history view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubmittedTransaction {
    /// Internal entry ID.
    pub id: String,
    /// Opaque transaction ID returned by the wallet adapter.
    pub tx_id: String,
    /// Which intent produced the transaction.
    pub action: RelayAction,
    /// Explorer link for display.
    pub explorer_url: String,
    /// Last observed status.
    pub status: TxStatus,
    /// When the adapter accepted the submission.
    pub submitted_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct PendingStore {
    entries: HashMap<String, SubmittedTransaction>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted submission as pending.
    pub fn record_submission(
        &mut self,
        action: RelayAction,
        tx_id: impl Into<String>,
        explorer_url: impl Into<String>,
    ) -> SubmittedTransaction {
        let id = Uuid::new_v4().to_string();
        let entry = SubmittedTransaction {
            id: id.clone(),
            tx_id: tx_id.into(),
            action,
            explorer_url: explorer_url.into(),
            status: TxStatus::Pending,
            submitted_at: Utc::now(),
        };
        self.entries.insert(id, entry.clone());
        entry
    }

    /// All tracked submissions, newest first.
    pub fn list(&self) -> Vec<SubmittedTransaction> {
        let mut all: Vec<_> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        all
    }

    /// Submissions the poller still needs to chase.
    pub fn non_terminal(&self) -> Vec<SubmittedTransaction> {
        self.entries
            .values()
            .filter(|entry| !entry.status.is_terminal())
            .cloned()
            .collect()
    }

    /// Update the status of a tracked submission. Unknown IDs are ignored;
    /// the poller may race a restart.
    pub fn set_status(&mut self, id: &str, status: TxStatus) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.status = status;
        }
    }
}
