// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Loan application and payment endpoints.

use axum::{extract::State, Json};

use crate::{
    credit::{interest_rate_bps, required_collateral},
    error::ApiError,
    models::{ApplyLoanRequest, LoanDetails, LoanView, LoansResponse, PaymentRequest, TransactionAccepted},
    state::AppState,
    store::RelayAction,
    wallet::{
        self, active_loans, cached_records, choose_record, parse_credits, unix_now,
        EncryptedRecord, LoanTerms, WalletSession,
    },
};

use super::submit_and_track;

fn parse_amount(field: &str, raw: &str) -> Result<wallet::MicroCredits, ApiError> {
    parse_credits(raw)
        .map_err(|err| ApiError::unprocessable(format!("Invalid {field} amount: {err}")))
}

async fn connected_session(state: &AppState) -> Result<(WalletSession, String), ApiError> {
    let session = state.boundary.session().await?;
    let address = session
        .address
        .clone()
        .filter(|_| session.connected)
        .ok_or_else(|| ApiError::from(wallet::WalletError::NotReady))?;
    Ok((session, address))
}

async fn loan_records(state: &AppState, address: &str) -> Vec<EncryptedRecord> {
    cached_records(
        state.boundary.as_ref(),
        &state.records,
        address,
        &state.config.loan_program,
    )
    .await
    .unwrap_or_default()
}

/// Active loans for the connected wallet, decrypted where permission
/// allows.
#[utoipa::path(
    get,
    path = "/v1/loans",
    tag = "Loans",
    responses((status = 200, body = LoansResponse))
)]
pub async fn list_loans(State(state): State<AppState>) -> Result<Json<LoansResponse>, ApiError> {
    let Ok((_, address)) = connected_session(&state).await else {
        return Ok(Json(LoansResponse { loans: Vec::new() }));
    };

    let records = loan_records(&state, &address).await;
    let mut loans = Vec::new();
    for record in active_loans(&records) {
        let details =
            wallet::decrypt_loan(state.boundary.as_ref(), &state.config.loan_program, &record)
                .await
                .map(|loan| LoanDetails::from(&loan));
        loans.push(LoanView {
            record_id: record.id,
            details,
        });
    }

    Ok(Json(LoansResponse { loans }))
}

/// Submit an `apply_for_loan` transaction against the credit profile
/// record.
///
/// Collateral and rate default from the borrower's score tier when the
/// profile decrypts; an opaque profile is priced at the most conservative
/// tier.
#[utoipa::path(
    post,
    path = "/v1/loans/apply",
    request_body = ApplyLoanRequest,
    tag = "Loans",
    responses(
        (status = 200, body = TransactionAccepted),
        (status = 409, description = "A loan application is already in progress"),
        (status = 422, description = "No profile record or invalid parameters")
    )
)]
pub async fn apply_for_loan(
    State(state): State<AppState>,
    Json(request): Json<ApplyLoanRequest>,
) -> Result<Json<TransactionAccepted>, ApiError> {
    let _latch = state.acquire_latch(RelayAction::ApplyForLoan)?;

    let (session, address) = connected_session(&state).await?;

    let records = cached_records(
        state.boundary.as_ref(),
        &state.records,
        &address,
        &state.config.credit_program,
    )
    .await
    .unwrap_or_default();
    let Some(choice) = choose_record(&records) else {
        return Err(ApiError::unprocessable(
            "No credit profile record found. Initialize a credit profile first.",
        ));
    };

    let principal = parse_amount("principal", &request.principal)?;

    // Score informs the defaults only; the program re-checks the terms.
    let score = wallet::decrypt_profile(
        state.boundary.as_ref(),
        &state.config.credit_program,
        &choice.record,
    )
    .await
    .map(|profile| profile.score);

    let collateral = match &request.collateral {
        Some(raw) => parse_amount("collateral", raw)?,
        None => required_collateral(score, principal),
    };
    let rate_bps = request.rate_bps.unwrap_or_else(|| interest_rate_bps(score));

    let tx = wallet::build_apply_for_loan(
        &session,
        &state.config.loan_program,
        &choice.record,
        LoanTerms {
            principal,
            collateral,
            term_blocks: request.term_blocks,
            rate_bps,
        },
    )?;

    let accepted = submit_and_track(&state, RelayAction::ApplyForLoan, &tx).await?;
    Ok(Json(accepted))
}

/// Submit a `make_payment` transaction on an active loan.
#[utoipa::path(
    post,
    path = "/v1/loans/payment",
    request_body = PaymentRequest,
    tag = "Loans",
    responses(
        (status = 200, body = TransactionAccepted),
        (status = 409, description = "A payment is already in progress"),
        (status = 422, description = "No matching loan record or invalid amount")
    )
)]
pub async fn make_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<TransactionAccepted>, ApiError> {
    let _latch = state.acquire_latch(RelayAction::MakePayment)?;

    let (session, address) = connected_session(&state).await?;
    let records = loan_records(&state, &address).await;

    let record = match &request.loan_record_id {
        Some(id) => records
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| {
                ApiError::unprocessable(
                    "Loan record not found. Refresh your loans and try again.",
                )
            })?,
        None => {
            choose_record(&records)
                .ok_or_else(|| ApiError::unprocessable("No active loan to pay against."))?
                .record
        }
    };

    let amount = parse_amount("payment", &request.amount)?;
    let tx = wallet::build_make_payment(
        &session,
        &state.config.loan_program,
        &record,
        amount,
        unix_now(),
    )?;

    let accepted = submit_and_track(&state, RelayAction::MakePayment, &tx).await?;
    Ok(Json(accepted))
}
