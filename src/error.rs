// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::wallet::WalletError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

/// Map the wallet boundary taxonomy to HTTP statuses with remediation
/// messages the dashboard can show verbatim. Unmatched rejections surface
/// the adapter's raw message.
impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotReady => ApiError::unavailable(
                "Wallet is not connected. Open the wallet extension and connect your account.",
            ),
            WalletError::Connection(detail) => ApiError::unavailable(format!(
                "Could not reach the wallet adapter ({detail}). Check that it is running."
            )),
            WalletError::PermissionDenied => ApiError::new(
                StatusCode::FORBIDDEN,
                "Decryption permission was not granted in the wallet.",
            ),
            WalletError::RecordAccess(detail) => {
                ApiError::unavailable(format!("Record access failed: {detail}"))
            }
            WalletError::InsufficientBalance => ApiError::unprocessable(
                "Insufficient public balance to cover the transaction fee. \
                 Add credits to your account and try again.",
            ),
            WalletError::RecordSpent => ApiError::conflict(
                "The selected record has already been spent. \
                 Your records will refresh shortly; try again after that.",
            ),
            WalletError::RecordInvalid(detail) => ApiError::unprocessable(detail),
            WalletError::Rejected(raw) => {
                ApiError::new(StatusCode::BAD_GATEWAY, format!("Transaction rejected: {raw}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let busy = ApiError::conflict("busy");
        assert_eq!(busy.status, StatusCode::CONFLICT);
        assert_eq!(busy.message, "busy");
    }

    #[test]
    fn wallet_errors_map_to_remediation_messages() {
        let err: ApiError = WalletError::NotReady.into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.message.contains("connect"));

        let err: ApiError = WalletError::InsufficientBalance.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = WalletError::RecordSpent.into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: ApiError = WalletError::Rejected("odd failure".into()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("odd failure"));
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
