// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Amounts cross the API as decimal credit strings (e.g. `"1.5"`); the
//! microcredit integers stay internal to the wallet module.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::credit::{collateral_ratio_pct, interest_rate_bps, tier_for_score, LoanStatus};
use crate::wallet::{DecryptedLoan, DecryptedProfile, RecordChoice};

// =============================================================================
// Profile Models
// =============================================================================

/// Summary of the encrypted record backing the profile view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RecordSummary {
    /// Opaque record identifier.
    pub id: String,
    /// Owner address.
    pub owner: String,
    /// Spent flag as reported by the adapter; absent means assumed unspent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<bool>,
    /// True when every record was spent and the newest was used anyway.
    pub spent_fallback: bool,
}

impl From<&RecordChoice> for RecordSummary {
    fn from(choice: &RecordChoice) -> Self {
        Self {
            id: choice.record.id.clone(),
            owner: choice.record.owner.clone(),
            spent: choice.record.spent,
            spent_fallback: choice.spent_fallback,
        }
    }
}

/// Decrypted profile fields plus the tier lookups derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileDetails {
    pub score: u16,
    /// Tier label for the score (e.g. "Good").
    pub tier: String,
    /// Required collateral as a percentage of principal.
    pub collateral_ratio_pct: u8,
    /// Indicative interest rate in basis points.
    pub interest_rate_bps: u16,
    pub payment_count: u32,
    pub on_time_payments: u32,
    pub late_payments: u32,
    pub defaults: u32,
    /// Lifetime totals as decimal credit strings.
    pub total_borrowed: String,
    pub total_repaid: String,
}

impl From<&DecryptedProfile> for ProfileDetails {
    fn from(profile: &DecryptedProfile) -> Self {
        let score = Some(profile.score);
        Self {
            score: profile.score,
            tier: tier_for_score(score).label.to_string(),
            collateral_ratio_pct: collateral_ratio_pct(score),
            interest_rate_bps: interest_rate_bps(score),
            payment_count: profile.payment_count,
            on_time_payments: profile.on_time_payments,
            late_payments: profile.late_payments,
            defaults: profile.defaults,
            total_borrowed: profile.total_borrowed.to_credits_string(),
            total_repaid: profile.total_repaid.to_credits_string(),
        }
    }
}

/// Profile view. `details` is present only when the user has granted
/// decryption permission; its absence is not an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileResponse {
    pub has_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProfileDetails>,
}

/// Result of a decryption permission request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecryptResponse {
    pub granted: bool,
}

// =============================================================================
// Transaction Models
// =============================================================================

/// An accepted submission, echoed back with its explorer link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionAccepted {
    pub tx_id: String,
    pub explorer_url: String,
}

// =============================================================================
// Loan Models
// =============================================================================

/// Request body for a loan application. Amounts are decimal credit strings.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplyLoanRequest {
    /// Principal in credits, e.g. `"100"`.
    pub principal: String,
    /// Collateral in credits; defaults to the tier requirement for the
    /// borrower's score when omitted.
    #[serde(default)]
    pub collateral: Option<String>,
    /// Term length in blocks.
    pub term_blocks: u32,
    /// Interest rate in basis points; defaults to the tier rate.
    #[serde(default)]
    pub rate_bps: Option<u16>,
}

/// Request body for a loan payment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// Which loan record to pay against; defaults to the selected active
    /// loan when omitted.
    #[serde(default)]
    pub loan_record_id: Option<String>,
    /// Payment amount in credits.
    pub amount: String,
}

/// Decrypted loan fields for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoanDetails {
    pub id: String,
    pub principal: String,
    pub collateral: String,
    pub remaining_balance: String,
    pub next_payment_due: u32,
    pub status: LoanStatus,
    pub payments_made: u32,
    pub term_blocks: u32,
    pub interest_rate_bps: u16,
}

impl From<&DecryptedLoan> for LoanDetails {
    fn from(loan: &DecryptedLoan) -> Self {
        Self {
            id: loan.id.clone(),
            principal: loan.principal.to_credits_string(),
            collateral: loan.collateral.to_credits_string(),
            remaining_balance: loan.remaining_balance.to_credits_string(),
            next_payment_due: loan.next_payment_due,
            status: LoanStatus::from_wire(loan.status),
            payments_made: loan.payments_made,
            term_blocks: loan.term_blocks,
            interest_rate_bps: loan.interest_rate,
        }
    }
}

/// One active loan: the encrypted record plus decrypted details when
/// permission allows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoanView {
    pub record_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<LoanDetails>,
}

/// Active loans response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoansResponse {
    pub loans: Vec<LoanView>,
}
