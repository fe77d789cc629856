// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Credit scoring display domain: tier tables and threshold lookups.
//!
//! The authoritative underwriting logic lives in the deployed programs;
//! these tables only mirror it for display and for pre-filling loan
//! parameters. They are centralized here so the thresholds cannot drift
//! between screens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wallet::MicroCredits;

/// Lowest representable credit score.
pub const CREDIT_SCORE_MIN: u16 = 300;

/// Highest representable credit score.
pub const CREDIT_SCORE_MAX: u16 = 850;

/// Starting score assigned to a freshly initialized profile.
pub const DEFAULT_SCORE: u16 = 600;

/// A credit score tier with its display metadata and collateral
/// requirement.
#[derive(Debug, Clone, Copy)]
pub struct ScoreTier {
    pub min: u16,
    pub max: u16,
    pub label: &'static str,
    /// Required collateral as a percentage of principal.
    pub collateral_pct: u8,
    /// Interest rate in basis points for this tier.
    pub rate_bps: u16,
}

/// Score tiers, highest first. Mirrors the tier table in the loan program.
pub const SCORE_TIERS: [ScoreTier; 5] = [
    ScoreTier { min: 800, max: 850, label: "Excellent", collateral_pct: 50, rate_bps: 500 },
    ScoreTier { min: 700, max: 799, label: "Good", collateral_pct: 75, rate_bps: 750 },
    ScoreTier { min: 650, max: 699, label: "Fair", collateral_pct: 100, rate_bps: 1000 },
    ScoreTier { min: 600, max: 649, label: "Poor", collateral_pct: 125, rate_bps: 1250 },
    ScoreTier { min: 300, max: 599, label: "Very Poor", collateral_pct: 150, rate_bps: 1500 },
];

/// Available loan terms in blocks, assuming ~60 blocks per hour.
pub const LOAN_TERMS_BLOCKS: [(u32, &str); 4] = [
    (43_200, "30 days"),
    (86_400, "60 days"),
    (129_600, "90 days"),
    (259_200, "180 days"),
];

/// Find the tier for a score. Out-of-range and unknown scores land in the
/// most conservative tier.
pub fn tier_for_score(score: Option<u16>) -> &'static ScoreTier {
    let bottom = &SCORE_TIERS[SCORE_TIERS.len() - 1];
    let Some(score) = score else {
        return bottom;
    };
    SCORE_TIERS
        .iter()
        .find(|tier| score >= tier.min && score <= tier.max)
        .unwrap_or(bottom)
}

/// Collateral requirement as a percentage of principal for a score.
///
/// An unknown score requires the maximum (150%): underwriting an opaque
/// profile is priced like the worst one.
pub fn collateral_ratio_pct(score: Option<u16>) -> u8 {
    tier_for_score(score).collateral_pct
}

/// Interest rate in basis points for a score; unknown scores get the
/// maximum rate.
pub fn interest_rate_bps(score: Option<u16>) -> u16 {
    tier_for_score(score).rate_bps
}

/// Collateral that must be locked for a principal at a given score.
pub fn required_collateral(score: Option<u16>, principal: MicroCredits) -> MicroCredits {
    let pct = u64::from(collateral_ratio_pct(score));
    MicroCredits(principal.0.saturating_mul(pct) / 100)
}

/// Loan lifecycle states, as encoded by the loan program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    PaidOff,
    Defaulted,
}

impl LoanStatus {
    /// Decode the numeric wire value; anything unrecognized reads as
    /// `Active`, the loan program's zero value.
    pub fn from_wire(value: u8) -> Self {
        match value {
            1 => LoanStatus::PaidOff,
            2 => LoanStatus::Defaulted,
            _ => LoanStatus::Active,
        }
    }
}

/// Payment outcomes, as encoded by the payment tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    OnTime,
    Late,
    Default,
}
