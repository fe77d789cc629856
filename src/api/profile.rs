// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Credit profile endpoints.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{DecryptResponse, ProfileDetails, ProfileResponse, RecordSummary, TransactionAccepted},
    state::AppState,
    store::RelayAction,
    wallet::{self, cached_records, choose_record},
};

use super::submit_and_track;

/// Profile view for the dashboard.
///
/// Tolerates every partial state: no wallet, no profile record, or no
/// decryption permission all render as a 200 with the respective fields
/// absent. A failed record fetch reads as "no profile" (logged upstream).
#[utoipa::path(
    get,
    path = "/v1/profile",
    tag = "Profile",
    responses((status = 200, body = ProfileResponse))
)]
pub async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    let empty = ProfileResponse {
        has_profile: false,
        record: None,
        details: None,
    };

    let session = match state.boundary.session().await {
        Ok(session) if session.connected => session,
        _ => return Ok(Json(empty)),
    };
    let Some(address) = session.address.as_deref() else {
        return Ok(Json(empty));
    };

    let records = cached_records(
        state.boundary.as_ref(),
        &state.records,
        address,
        &state.config.credit_program,
    )
    .await
    .unwrap_or_default();

    let Some(choice) = choose_record(&records) else {
        return Ok(Json(empty));
    };

    let details = wallet::decrypt_profile(
        state.boundary.as_ref(),
        &state.config.credit_program,
        &choice.record,
    )
    .await
    .map(|profile| ProfileDetails::from(&profile));

    Ok(Json(ProfileResponse {
        has_profile: true,
        record: Some(RecordSummary::from(&choice)),
        details,
    }))
}

/// Submit the `initialize_credit` transaction for the connected wallet.
#[utoipa::path(
    post,
    path = "/v1/profile/initialize",
    tag = "Profile",
    responses(
        (status = 200, body = TransactionAccepted),
        (status = 409, description = "An initialization is already in progress"),
        (status = 503, description = "Wallet not connected")
    )
)]
pub async fn initialize_profile(
    State(state): State<AppState>,
) -> Result<Json<TransactionAccepted>, ApiError> {
    // Latch before the first await so a double-click cannot queue a second
    // wallet prompt.
    let _latch = state.acquire_latch(RelayAction::InitializeProfile)?;

    let session = state.boundary.session().await?;
    let request = wallet::build_initialize_profile(&session, &state.config.credit_program)?;
    let accepted = submit_and_track(&state, RelayAction::InitializeProfile, &request).await?;
    Ok(Json(accepted))
}

/// Ask the wallet for decryption permission on the credit program.
///
/// Refusal is an expected outcome and reads as `granted: false`, never an
/// error.
#[utoipa::path(
    post,
    path = "/v1/profile/decrypt",
    tag = "Profile",
    responses((status = 200, body = DecryptResponse))
)]
pub async fn request_decryption(State(state): State<AppState>) -> Json<DecryptResponse> {
    let granted =
        wallet::request_decryption(state.boundary.as_ref(), &state.config.credit_program).await;
    Json(DecryptResponse { granted })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::config::RelayConfig;
    use crate::wallet::testing::MockBoundary;
    use crate::wallet::{EncryptedRecord, WalletSession};

    fn record(id: &str, spent: Option<bool>) -> EncryptedRecord {
        EncryptedRecord {
            id: id.to_string(),
            owner: "aleo1owner".to_string(),
            spent,
            program_id: Some("credit_score.aleo".to_string()),
            ciphertext: None,
        }
    }

    fn state_with(boundary: MockBoundary) -> AppState {
        AppState::new(RelayConfig::default(), Arc::new(boundary))
    }

    #[tokio::test]
    async fn profile_view_combines_record_and_decrypted_details() {
        let boundary = MockBoundary::new()
            .with_records(vec![record("rec1", Some(false))])
            .with_plaintexts(vec![json!({"id": "rec1", "score": 810})]);
        let state = state_with(boundary);

        let Json(response) = get_profile(State(state)).await.unwrap();
        assert!(response.has_profile);
        assert_eq!(response.record.unwrap().id, "rec1");
        let details = response.details.unwrap();
        assert_eq!(details.score, 810);
        assert_eq!(details.tier, "Excellent");
        assert_eq!(details.collateral_ratio_pct, 50);
    }

    #[tokio::test]
    async fn profile_view_without_permission_still_shows_the_record() {
        let boundary = MockBoundary::new()
            .with_records(vec![record("rec1", Some(false))])
            .denying_plaintexts();
        let state = state_with(boundary);

        let Json(response) = get_profile(State(state)).await.unwrap();
        assert!(response.has_profile);
        assert!(response.details.is_none());
    }

    #[tokio::test]
    async fn profile_view_tolerates_missing_wallet() {
        let boundary = MockBoundary::new().with_session(WalletSession::disconnected());
        let state = state_with(boundary);

        let Json(response) = get_profile(State(state)).await.unwrap();
        assert!(!response.has_profile);
    }

    #[tokio::test]
    async fn initialize_submits_and_tracks_the_transaction() {
        let state = state_with(MockBoundary::new());
        let Json(accepted) = initialize_profile(State(state.clone())).await.unwrap();

        assert!(accepted.explorer_url.contains(&accepted.tx_id));
        let history = state.pending.read().await.list();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, RelayAction::InitializeProfile);
    }

    #[tokio::test]
    async fn overlapping_initialize_calls_submit_exactly_once() {
        let boundary = Arc::new(MockBoundary::new());
        let state = AppState::new(RelayConfig::default(), boundary.clone());

        // First call in flight: its latch is held.
        let latch = state.acquire_latch(RelayAction::InitializeProfile).unwrap();
        let err = initialize_profile(State(state.clone())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(boundary.submit_calls(), 0);

        drop(latch);
        initialize_profile(State(state)).await.unwrap();
        assert_eq!(boundary.submit_calls(), 1);
    }

    #[tokio::test]
    async fn decrypt_endpoint_reports_refusal_as_not_granted() {
        let state = state_with(MockBoundary::new().denying_plaintexts());
        let Json(response) = request_decryption(State(state)).await;
        assert!(!response.granted);

        let state = state_with(MockBoundary::new().with_plaintexts(vec![json!({"id": "rec1"})]));
        let Json(response) = request_decryption(State(state)).await;
        assert!(response.granted);
    }
}
