// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Permission-gated record decryption.
//!
//! Revealing plaintexts raises a wallet prompt the user is free to decline,
//! so refusal is an expected outcome here: every function resolves to a
//! boolean or an `Option`, never an error. Decrypted data is ephemeral and
//! recomputed per request; only the encrypted record lists are cached.

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::credit::DEFAULT_SCORE;

use super::boundary::{WalletBoundary, WalletError};
use super::transactions::MicroCredits;
use super::types::EncryptedRecord;

/// Plaintext fields of a credit profile record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedProfile {
    pub score: u16,
    pub payment_count: u32,
    pub on_time_payments: u32,
    pub late_payments: u32,
    pub defaults: u32,
    /// Lifetime totals in microcredits.
    pub total_borrowed: MicroCredits,
    pub total_repaid: MicroCredits,
}

/// Plaintext fields of a loan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedLoan {
    pub id: String,
    pub principal: MicroCredits,
    pub collateral: MicroCredits,
    pub remaining_balance: MicroCredits,
    pub next_payment_due: u32,
    /// Numeric wire status; see [`crate::credit::LoanStatus`].
    pub status: u8,
    pub payments_made: u32,
    pub term_blocks: u32,
    pub interest_rate: u16,
}

/// Trigger the decryption permission prompt for a program.
///
/// Returns true only when at least one plaintext came back. Permission
/// refusal and empty results both return false; unexpected errors are
/// logged and still return false.
pub async fn request_decryption(boundary: &dyn WalletBoundary, program_id: &str) -> bool {
    match boundary.request_record_plaintexts(program_id).await {
        Ok(plaintexts) => !plaintexts.is_empty(),
        Err(err) => {
            log_decrypt_error(&err, program_id);
            false
        }
    }
}

/// Decrypt a credit profile record by matching it against the program's
/// plaintexts. `None` on no match or permission refusal.
pub async fn decrypt_profile(
    boundary: &dyn WalletBoundary,
    credit_program: &str,
    record: &EncryptedRecord,
) -> Option<DecryptedProfile> {
    let plaintexts = fetch_plaintexts(boundary, credit_program).await?;

    for plaintext in &plaintexts {
        let Some(parsed) = parse_plaintext(plaintext) else {
            continue;
        };
        if matches_profile(&parsed, record) {
            return Some(DecryptedProfile {
                score: field_u64(&parsed, "score", u64::from(DEFAULT_SCORE)) as u16,
                payment_count: field_u64(&parsed, "payment_count", 0) as u32,
                on_time_payments: field_u64(&parsed, "on_time_payments", 0) as u32,
                late_payments: field_u64(&parsed, "late_payments", 0) as u32,
                defaults: field_u64(&parsed, "defaults", 0) as u32,
                total_borrowed: MicroCredits(field_u64(&parsed, "total_borrowed", 0)),
                total_repaid: MicroCredits(field_u64(&parsed, "total_repaid", 0)),
            });
        }
    }

    None
}

/// Decrypt a loan record. Loans match by `id` or `loan_id`.
pub async fn decrypt_loan(
    boundary: &dyn WalletBoundary,
    loan_program: &str,
    record: &EncryptedRecord,
) -> Option<DecryptedLoan> {
    let plaintexts = fetch_plaintexts(boundary, loan_program).await?;

    for plaintext in &plaintexts {
        let Some(parsed) = parse_plaintext(plaintext) else {
            continue;
        };
        if matches_loan(&parsed, record) {
            let id = field_str(&parsed, "loan_id")
                .or_else(|| field_str(&parsed, "id"))
                .unwrap_or_default();
            return Some(DecryptedLoan {
                id,
                principal: MicroCredits(field_u64(&parsed, "principal", 0)),
                collateral: MicroCredits(field_u64(&parsed, "collateral", 0)),
                remaining_balance: MicroCredits(field_u64(&parsed, "remaining_balance", 0)),
                next_payment_due: field_u64(&parsed, "next_payment_due", 0) as u32,
                status: field_u64(&parsed, "status", 0) as u8,
                payments_made: field_u64(&parsed, "payments_made", 0) as u32,
                term_blocks: field_u64(&parsed, "term_blocks", 0) as u32,
                interest_rate: field_u64(&parsed, "interest_rate", 500) as u16,
            });
        }
    }

    None
}

async fn fetch_plaintexts(boundary: &dyn WalletBoundary, program_id: &str) -> Option<Vec<Value>> {
    match boundary.request_record_plaintexts(program_id).await {
        Ok(plaintexts) if plaintexts.is_empty() => None,
        Ok(plaintexts) => Some(plaintexts),
        Err(err) => {
            log_decrypt_error(&err, program_id);
            None
        }
    }
}

fn log_decrypt_error(err: &WalletError, program_id: &str) {
    match err {
        WalletError::PermissionDenied | WalletError::RecordAccess(_) => {
            debug!(program_id, "decryption permission not granted");
        }
        other => error!(program_id, error = %other, "unexpected decryption failure"),
    }
}

/// Adapters hand back either pre-parsed objects or string-encoded JSON.
fn parse_plaintext(value: &Value) -> Option<Value> {
    match value {
        Value::String(raw) => match serde_json::from_str(raw) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(error = %err, "skipping unparseable plaintext");
                None
            }
        },
        Value::Object(_) => Some(value.clone()),
        _ => None,
    }
}

/// Profiles match by record ID, or by owner when the adapter re-keys the
/// plaintext.
fn matches_profile(parsed: &Value, record: &EncryptedRecord) -> bool {
    field_str(parsed, "id").as_deref() == Some(record.id.as_str())
        || field_str(parsed, "owner").as_deref() == Some(record.owner.as_str())
}

/// Loans match by record ID or the program's own `loan_id` field.
fn matches_loan(parsed: &Value, record: &EncryptedRecord) -> bool {
    field_str(parsed, "id").as_deref() == Some(record.id.as_str())
        || field_str(parsed, "loan_id").as_deref() == Some(record.id.as_str())
}

fn field_str(parsed: &Value, key: &str) -> Option<String> {
    parsed.get(key)?.as_str().map(str::to_string)
}

/// Numeric field lookup with a protocol baseline for anything absent, so
/// display logic downstream is total. Tolerates plain numbers and
/// Leo-suffixed literals like `"600u16"`.
fn field_u64(parsed: &Value, key: &str, default: u64) -> u64 {
    match parsed.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
        Some(Value::String(s)) => {
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(default)
        }
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::MockBoundary;
    use super::*;

    fn record(id: &str, owner: &str) -> EncryptedRecord {
        EncryptedRecord {
            id: id.to_string(),
            owner: owner.to_string(),
            spent: Some(false),
            program_id: Some("credit_score.aleo".to_string()),
            ciphertext: None,
        }
    }

    #[tokio::test]
    async fn request_decryption_true_on_non_empty_plaintexts() {
        let boundary = MockBoundary::new().with_plaintexts(vec![json!({"id": "rec1"})]);
        assert!(request_decryption(&boundary, "credit_score.aleo").await);
    }

    #[tokio::test]
    async fn request_decryption_false_on_permission_denial_without_throwing() {
        let boundary = MockBoundary::new().denying_plaintexts();
        assert!(!request_decryption(&boundary, "credit_score.aleo").await);

        let boundary = MockBoundary::new(); // empty plaintext list
        assert!(!request_decryption(&boundary, "credit_score.aleo").await);
    }

    #[tokio::test]
    async fn profile_decrypts_from_string_encoded_plaintext() {
        let plaintext = json!({
            "id": "rec1",
            "score": 720,
            "payment_count": 4,
            "on_time_payments": 4
        })
        .to_string();
        let boundary = MockBoundary::new().with_plaintexts(vec![Value::String(plaintext)]);

        let profile = decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
            .await
            .unwrap();
        assert_eq!(profile.score, 720);
        assert_eq!(profile.payment_count, 4);
        // Absent numerics fall back to baselines, never to garbage.
        assert_eq!(profile.late_payments, 0);
        assert_eq!(profile.total_borrowed, MicroCredits(0));
    }

    #[tokio::test]
    async fn profile_matches_by_owner_when_ids_differ() {
        let boundary = MockBoundary::new()
            .with_plaintexts(vec![json!({"id": "other", "owner": "aleo1owner", "score": 650})]);
        let profile = decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
            .await
            .unwrap();
        assert_eq!(profile.score, 650);
    }

    #[tokio::test]
    async fn missing_score_defaults_to_baseline() {
        let boundary = MockBoundary::new().with_plaintexts(vec![json!({"id": "rec1"})]);
        let profile = decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
            .await
            .unwrap();
        assert_eq!(profile.score, DEFAULT_SCORE);
    }

    #[tokio::test]
    async fn no_match_decrypts_to_none() {
        let boundary = MockBoundary::new()
            .with_plaintexts(vec![json!({"id": "someone-else", "owner": "aleo1other"})]);
        assert!(
            decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn permission_denial_decrypts_to_none() {
        let boundary = MockBoundary::new().denying_plaintexts();
        assert!(
            decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn loan_matches_by_loan_id_and_parses_suffixed_literals() {
        let boundary = MockBoundary::new().with_plaintexts(vec![json!({
            "loan_id": "loan7",
            "principal": "100000000u64",
            "collateral": 50_000_000u64,
            "remaining_balance": "75000000u64",
            "status": 0,
            "term_blocks": 43200
        })]);

        let loan = decrypt_loan(&boundary, "loan_managerv1.aleo", &record("loan7", "aleo1owner"))
            .await
            .unwrap();
        assert_eq!(loan.id, "loan7");
        assert_eq!(loan.principal, MicroCredits(100_000_000));
        assert_eq!(loan.collateral, MicroCredits(50_000_000));
        assert_eq!(loan.remaining_balance, MicroCredits(75_000_000));
        assert_eq!(loan.term_blocks, 43_200);
        assert_eq!(loan.interest_rate, 500);
    }

    #[tokio::test]
    async fn unparseable_plaintexts_are_skipped_not_fatal() {
        let boundary = MockBoundary::new().with_plaintexts(vec![
            Value::String("not json at all".to_string()),
            json!({"id": "rec1", "score": 810}),
        ]);
        let profile = decrypt_profile(&boundary, "credit_score.aleo", &record("rec1", "aleo1owner"))
            .await
            .unwrap();
        assert_eq!(profile.score, 810);
    }
}
