// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Transaction shaping for the credit and loan programs.
//!
//! Builders here are pure: they turn a session plus domain parameters into a
//! [`TransactionRequest`] without touching the wallet boundary. Submission is
//! a separate single call so input validation always happens first.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{
    BLOCK_INTERVAL_SECS, INITIALIZE_FEE, LOAN_ACTION_FEE, MICROCREDITS_PER_CREDIT,
};

use super::boundary::WalletError;
use super::types::{EncryptedRecord, WalletSession};

/// Transition entry points consumed by this service.
pub const INITIALIZE_CREDIT: &str = "initialize_credit";
pub const APPLY_FOR_LOAN: &str = "apply_for_loan";
pub const MAKE_PAYMENT: &str = "make_payment";

/// An amount in base units (microcredits).
///
/// All credit amounts crossing the wallet boundary are integers in this
/// unit; the scale factor lives in one place
/// ([`crate::config::MICROCREDITS_PER_CREDIT`]) so it cannot drift between
/// call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MicroCredits(pub u64);

impl MicroCredits {
    /// Render as a Leo `u64` literal, e.g. `100000000u64`.
    pub fn to_leo(self) -> String {
        format!("{}u64", self.0)
    }

    /// Decode back to a decimal credit string (display only).
    pub fn to_credits_string(self) -> String {
        format_credits(self.0)
    }
}

/// Errors from decimal credit parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid amount format")]
    Format,

    #[error("Too many decimal places (max 6)")]
    TooManyDecimals,

    #[error("Amount overflow")]
    Overflow,
}

/// Parse a human-readable credit amount (e.g. `"1.5"`) to microcredits.
///
/// Parsing is exact: the decimal part is padded to six digits rather than
/// routed through floating point, so integer credits encode without error
/// (`"100"` → `100000000`).
pub fn parse_credits(amount: &str) -> Result<MicroCredits, AmountError> {
    let parts: Vec<&str> = amount.trim().split('.').collect();

    if parts.len() > 2 || parts[0].is_empty() {
        return Err(AmountError::Format);
    }

    let whole = parts[0].parse::<u64>().map_err(|_| AmountError::Format)?;

    let decimals = MICROCREDITS_PER_CREDIT.ilog10() as usize;
    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals {
            return Err(AmountError::TooManyDecimals);
        }
        if dec_str.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", dec_str, width = decimals);
            padded.parse::<u64>().map_err(|_| AmountError::Format)?
        }
    } else {
        0
    };

    whole
        .checked_mul(MICROCREDITS_PER_CREDIT)
        .and_then(|w| w.checked_add(decimal_part))
        .map(MicroCredits)
        .ok_or(AmountError::Overflow)
}

/// Format microcredits as a human-readable credit amount.
pub fn format_credits(microcredits: u64) -> String {
    let whole = microcredits / MICROCREDITS_PER_CREDIT;
    let remainder = microcredits % MICROCREDITS_PER_CREDIT;

    if remainder == 0 {
        whole.to_string()
    } else {
        let decimals = MICROCREDITS_PER_CREDIT.ilog10() as usize;
        let decimal_str = format!("{:0>width$}", remainder, width = decimals);
        format!("{}.{}", whole, decimal_str.trim_end_matches('0'))
    }
}

/// A single typed argument to a program transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionInput {
    /// A record object, passed through as-is.
    Record(EncryptedRecord),
    /// Unsigned 64-bit literal (amounts, in microcredits).
    U64(MicroCredits),
    /// Unsigned 32-bit literal (term lengths, block heights).
    U32(u32),
    /// Unsigned 16-bit literal (rates in basis points).
    U16(u16),
    /// An account address literal.
    Address(String),
}

impl TransitionInput {
    /// Wire rendering for the adapter: records stay objects, numeric
    /// literals become Leo-suffixed strings.
    pub fn to_wire(&self) -> Value {
        match self {
            TransitionInput::Record(record) => json!(record),
            TransitionInput::U64(amount) => Value::String(amount.to_leo()),
            TransitionInput::U32(value) => Value::String(format!("{value}u32")),
            TransitionInput::U16(value) => Value::String(format!("{value}u16")),
            TransitionInput::Address(address) => Value::String(address.clone()),
        }
    }
}

/// A shaped transaction, ready for a single submit call to the boundary.
///
/// Built fresh per action and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    /// Deployed program ID.
    pub program_id: String,
    /// Transition entry point name.
    pub transition: String,
    /// Ordered argument list in wire form.
    pub inputs: Vec<Value>,
    /// Fee in microcredits.
    pub fee: u64,
    /// Whether the fee is paid from private records (always false here:
    /// fees come from the public balance).
    pub fee_private: bool,
}

/// Approximate the current block height from wall-clock time.
///
/// Documented approximation: testnet blocks land roughly every
/// [`BLOCK_INTERVAL_SECS`] seconds, and the loan program tolerates
/// approximate heights. A node query would be exact but would couple every
/// payment to API availability.
pub fn approximate_block_height(unix_seconds: u64) -> u32 {
    (unix_seconds / BLOCK_INTERVAL_SECS) as u32
}

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn connected_address(session: &WalletSession) -> Result<&str, WalletError> {
    if !session.connected || !session.can_submit {
        return Err(WalletError::NotReady);
    }
    session.address.as_deref().ok_or(WalletError::NotReady)
}

/// Reject records missing the fields every transition input needs, before
/// any boundary contact.
fn validate_record(record: &EncryptedRecord, what: &str) -> Result<(), WalletError> {
    if record.id.trim().is_empty() || record.owner.trim().is_empty() {
        return Err(WalletError::RecordInvalid(format!(
            "{what} record is missing required fields (id or owner). \
             Refresh the page and try again."
        )));
    }
    if record.spent == Some(true) {
        // Let the adapter arbitrate: it may know the record was re-minted.
        tracing::warn!(record_id = %record.id, "{what} record is marked spent");
    }
    Ok(())
}

/// Shape the `initialize_credit` transaction: the single input is the
/// caller's own address.
pub fn build_initialize_profile(
    session: &WalletSession,
    credit_program: &str,
) -> Result<TransactionRequest, WalletError> {
    let address = connected_address(session)?;

    Ok(TransactionRequest {
        program_id: credit_program.to_string(),
        transition: INITIALIZE_CREDIT.to_string(),
        inputs: vec![TransitionInput::Address(address.to_string()).to_wire()],
        fee: INITIALIZE_FEE,
        fee_private: false,
    })
}

/// Loan parameters for [`build_apply_for_loan`].
#[derive(Debug, Clone, Copy)]
pub struct LoanTerms {
    /// Principal in microcredits.
    pub principal: MicroCredits,
    /// Locked collateral in microcredits.
    pub collateral: MicroCredits,
    /// Term length in blocks.
    pub term_blocks: u32,
    /// Interest rate in basis points.
    pub rate_bps: u16,
}

/// Shape the `apply_for_loan` transaction.
///
/// The credit profile record must carry non-empty `id` and `owner` fields;
/// this is validated here, before the boundary is contacted.
pub fn build_apply_for_loan(
    session: &WalletSession,
    loan_program: &str,
    profile_record: &EncryptedRecord,
    terms: LoanTerms,
) -> Result<TransactionRequest, WalletError> {
    connected_address(session)?;
    validate_record(profile_record, "Credit profile")?;

    let inputs = vec![
        TransitionInput::Record(profile_record.clone()),
        TransitionInput::U64(terms.principal),
        TransitionInput::U64(terms.collateral),
        TransitionInput::U32(terms.term_blocks),
        TransitionInput::U16(terms.rate_bps),
    ];

    Ok(TransactionRequest {
        program_id: loan_program.to_string(),
        transition: APPLY_FOR_LOAN.to_string(),
        inputs: inputs.iter().map(TransitionInput::to_wire).collect(),
        fee: LOAN_ACTION_FEE,
        fee_private: false,
    })
}

/// Shape the `make_payment` transaction.
///
/// `unix_seconds` feeds the block-height approximation; production callers
/// pass [`unix_now`], tests pass fixed values.
pub fn build_make_payment(
    session: &WalletSession,
    loan_program: &str,
    loan_record: &EncryptedRecord,
    amount: MicroCredits,
    unix_seconds: u64,
) -> Result<TransactionRequest, WalletError> {
    connected_address(session)?;
    validate_record(loan_record, "Loan")?;

    let inputs = vec![
        TransitionInput::Record(loan_record.clone()),
        TransitionInput::U64(amount),
        TransitionInput::U32(approximate_block_height(unix_seconds)),
    ];

    Ok(TransactionRequest {
        program_id: loan_program.to_string(),
        transition: MAKE_PAYMENT.to_string(),
        inputs: inputs.iter().map(TransitionInput::to_wire).collect(),
        fee: LOAN_ACTION_FEE,
        fee_private: false,
    })
}
