// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Zkredit Relay - Privacy-Preserving Credit Relay Service
//!
//! This crate bridges a credit/lending dashboard to an external Aleo wallet
//! adapter. The adapter builds and submits the zero-knowledge transactions;
//! this service shapes them, caches record fetches to avoid prompt storms,
//! and renders the resulting state for the dashboard.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `wallet` - Wallet adapter boundary, record cache, transaction shaping
//! - `credit` - Score tier tables and threshold lookups
//! - `store` - In-memory submitted-transaction log
//! - `tx_poller` - Background transaction status poller

pub mod api;
pub mod config;
pub mod credit;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod tx_poller;
pub mod wallet;
