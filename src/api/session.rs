// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

use axum::{extract::State, Json};

use crate::{error::ApiError, state::AppState, wallet::WalletError, wallet::WalletSession};

/// Current wallet connection state.
///
/// An adapter that answers "not ready" renders as a disconnected session
/// rather than an error: the dashboard shows its connect prompt either way.
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses((status = 200, body = WalletSession))
)]
pub async fn get_session(State(state): State<AppState>) -> Result<Json<WalletSession>, ApiError> {
    match state.boundary.session().await {
        Ok(session) => Ok(Json(session)),
        Err(WalletError::NotReady) => Ok(Json(WalletSession::disconnected())),
        Err(err) => Err(err.into()),
    }
}
