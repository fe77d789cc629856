// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! HTTP implementation of the wallet adapter boundary.
//!
//! The adapter daemon fronts the browser wallet extension and exposes a
//! small JSON API. Transport failures map to [`WalletError::Connection`];
//! adapter-reported errors carry a `{ "error": { "name", "message" } }`
//! body and go through [`classify_rejection`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::boundary::{classify_rejection, WalletBoundary, WalletError};
use super::transactions::TransactionRequest;
use super::types::{EncryptedRecord, TxStatus, WalletSession};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Deserialize)]
struct AdapterErrorBody {
    error: AdapterError,
}

#[derive(Debug, Deserialize)]
struct AdapterError {
    #[serde(default)]
    name: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    transaction_id: String,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Option<Vec<EncryptedRecord>>,
}

#[derive(Debug, Deserialize)]
struct PlaintextsResponse {
    plaintexts: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: TxStatus,
}

/// Wallet adapter client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWalletBoundary {
    base_url: String,
    client: Client,
}

impl HttpWalletBoundary {
    /// Client against the adapter at `base_url`.
    ///
    /// The timeout is generous: record and plaintext requests block on a
    /// user-facing prompt in the wallet.
    pub fn new(base_url: impl Into<String>) -> Result<Self, WalletError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| WalletError::Connection(format!("invalid adapter URL: {e}")))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a response, routing adapter error bodies through the
    /// classifier.
    async fn decode<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, WalletError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| WalletError::Connection(format!("invalid adapter response: {e}")));
        }

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(WalletError::NotReady);
        }

        let raw = response.text().await.unwrap_or_default();
        match serde_json::from_str::<AdapterErrorBody>(&raw) {
            Ok(body) => Err(classify_rejection(
                body.error.name.as_deref(),
                &body.error.message,
            )),
            Err(_) => Err(classify_rejection(None, &raw)),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, WalletError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;
        self.decode(response).await
    }
}

#[async_trait]
impl WalletBoundary for HttpWalletBoundary {
    async fn session(&self) -> Result<WalletSession, WalletError> {
        self.get("/session").await
    }

    async fn submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<String, WalletError> {
        info!(
            program_id = %request.program_id,
            transition = %request.transition,
            fee = request.fee,
            "submitting transaction to wallet adapter"
        );

        let response = self
            .client
            .post(self.endpoint("/transactions"))
            .json(request)
            .send()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        let body: SubmitResponse = self.decode(response).await?;
        info!(tx_id = %body.transaction_id, "transaction accepted by adapter");
        Ok(body.transaction_id)
    }

    async fn request_records(
        &self,
        program_id: &str,
    ) -> Result<Option<Vec<EncryptedRecord>>, WalletError> {
        let body: RecordsResponse = self.get(&format!("/records/{program_id}")).await?;
        Ok(body.records)
    }

    async fn request_record_plaintexts(
        &self,
        program_id: &str,
    ) -> Result<Vec<Value>, WalletError> {
        let body: PlaintextsResponse = self
            .get(&format!("/records/{program_id}/plaintexts"))
            .await?;
        Ok(body.plaintexts.unwrap_or_default())
    }

    async fn transaction_status(&self, tx_id: &str) -> Result<TxStatus, WalletError> {
        let body: StatusResponse = self.get(&format!("/transactions/{tx_id}")).await?;
        Ok(body.status)
    }
}
