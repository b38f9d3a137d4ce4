//! Commission entitlement and partial-payment release math.
//!
//! A closer's commission on a sale is `sale_amount * rate`, always. Cash
//! often arrives in installments, so the released portion tracks collected
//! cash linearly: collect half the sale, release half the commission. The
//! math here is pure and unrounded; persistence rounds to cents at the
//! boundary via [`round_to_cents`].

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Release statuses
// ---------------------------------------------------------------------------

pub const RELEASE_PENDING: &str = "pending";
pub const RELEASE_PARTIAL: &str = "partial";
pub const RELEASE_RELEASED: &str = "released";
/// Terminal state, set only when payout is confirmed. Never derived from
/// amounts.
pub const RELEASE_PAID: &str = "paid";

pub const RELEASE_STATUSES: &[&str] =
    &[RELEASE_PENDING, RELEASE_PARTIAL, RELEASE_RELEASED, RELEASE_PAID];

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Total entitlement vs. the portion released by collected cash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionBreakdown {
    pub total: f64,
    pub released: f64,
}

/// Compute commission amounts for a sale.
///
/// With no `payment_amount`, or one covering the full sale, the entire
/// commission is released. A payment strictly below the sale amount
/// releases `total * (payment / sale)`.
pub fn calculate_commission(
    sale_amount: f64,
    commission_rate: f64,
    payment_amount: Option<f64>,
) -> CommissionBreakdown {
    let total = sale_amount * commission_rate;
    let released = match payment_amount {
        Some(paid) if paid < sale_amount => total * (paid / sale_amount),
        _ => total,
    };
    CommissionBreakdown { total, released }
}

/// Round a currency amount to whole cents for persistence.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Derive the non-terminal release status from rounded amounts.
pub fn release_status_for(total_amount: f64, released_amount: f64) -> &'static str {
    let total = round_to_cents(total_amount);
    let released = round_to_cents(released_amount);
    if released >= total {
        RELEASE_RELEASED
    } else if released > 0.0 {
        RELEASE_PARTIAL
    } else {
        RELEASE_PENDING
    }
}

/// Validate the inputs a commission is derived from.
pub fn validate_commission_inputs(sale_amount: f64, commission_rate: f64) -> Result<(), CoreError> {
    if !sale_amount.is_finite() || sale_amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Sale amount must be a positive number, got {sale_amount}"
        )));
    }
    if !commission_rate.is_finite() || !(0.0..=1.0).contains(&commission_rate) {
        return Err(CoreError::Validation(format!(
            "Commission rate must be between 0 and 1, got {commission_rate}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
