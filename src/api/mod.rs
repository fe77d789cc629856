// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::SPENT_RECORD_REFRESH_DELAY;
use crate::error::ApiError;
use crate::models::{
    ApplyLoanRequest, DecryptResponse, LoanDetails, LoanView, LoansResponse, PaymentRequest,
    ProfileDetails, ProfileResponse, RecordSummary, TransactionAccepted,
};
use crate::state::AppState;
use crate::store::{RelayAction, SubmittedTransaction};
use crate::wallet::{transaction_url, TransactionRequest, WalletError, WalletSession};

pub mod health;
pub mod loans;
pub mod profile;
pub mod session;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/profile", get(profile::get_profile))
        .route("/profile/initialize", post(profile::initialize_profile))
        .route("/profile/decrypt", post(profile::request_decryption))
        .route("/loans", get(loans::list_loans))
        .route("/loans/apply", post(loans::apply_for_loan))
        .route("/loans/payment", post(loans::make_payment))
        .route("/transactions", get(transactions::list_transactions))
        .with_state(state.clone());

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Submit a shaped transaction once and track the result.
///
/// On acceptance the record cache is cleared so the next read observes the
/// post-transaction records. A spent-record rejection schedules a delayed
/// cache clear instead: the ledger needs a moment before a refetch sees
/// the replacement record.
pub(crate) async fn submit_and_track(
    state: &AppState,
    action: RelayAction,
    request: &TransactionRequest,
) -> Result<TransactionAccepted, ApiError> {
    match state.boundary.submit_transaction(request).await {
        Ok(tx_id) => {
            state.records.lock().await.clear();
            let explorer_url = transaction_url(&state.config.explorer_url, &tx_id);
            state
                .pending
                .write()
                .await
                .record_submission(action, &tx_id, &explorer_url);
            Ok(TransactionAccepted {
                tx_id,
                explorer_url,
            })
        }
        Err(err) => {
            if err == WalletError::RecordSpent {
                state.schedule_record_refresh(SPENT_RECORD_REFRESH_DELAY);
            }
            Err(err.into())
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::get_session,
        profile::get_profile,
        profile::initialize_profile,
        profile::request_decryption,
        loans::list_loans,
        loans::apply_for_loan,
        loans::make_payment,
        transactions::list_transactions,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            WalletSession,
            ProfileResponse,
            ProfileDetails,
            RecordSummary,
            DecryptResponse,
            TransactionAccepted,
            ApplyLoanRequest,
            PaymentRequest,
            LoansResponse,
            LoanView,
            LoanDetails,
            SubmittedTransaction,
            RelayAction,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Session", description = "Wallet connection state"),
        (name = "Profile", description = "Credit profile views and initialization"),
        (name = "Loans", description = "Loan application and payments"),
        (name = "Transactions", description = "Submitted transaction history"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
