//! Payment-to-appointment match resolution.
//!
//! Incoming payments rarely carry a clean foreign key, so the matcher tries
//! signals in strict priority order and stops at the first hit: explicit
//! appointment id, then contact email, then contact phone, then fuzzy
//! payer-name plus amount. Confidence is a fixed heuristic score per method,
//! not a probability. A fuzzy result with several plausible appointments is
//! surfaced as unresolved with the candidate list attached; the matcher
//! never picks one arbitrarily.
//!
//! Candidate retrieval is SQL territory; this module owns the vocabulary,
//! the tolerance arithmetic, and the resolution shape.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Match methods and confidence scores
// ---------------------------------------------------------------------------

pub const METHOD_APPOINTMENT_ID: &str = "appointment_id";
pub const METHOD_EMAIL: &str = "email";
pub const METHOD_PHONE: &str = "phone";
pub const METHOD_NAME_AMOUNT: &str = "name_amount";
pub const METHOD_MANUAL: &str = "manual";
pub const METHOD_NONE: &str = "none";

pub const CONFIDENCE_APPOINTMENT_ID: f64 = 1.0;
pub const CONFIDENCE_EMAIL: f64 = 0.9;
pub const CONFIDENCE_PHONE: f64 = 0.85;
pub const CONFIDENCE_NAME_AMOUNT: f64 = 0.7;
pub const CONFIDENCE_AMBIGUOUS: f64 = 0.5;
pub const CONFIDENCE_MANUAL: f64 = 1.0;
pub const CONFIDENCE_NONE: f64 = 0.0;

/// Trailing window, from the payment's arrival, in which a signed
/// appointment is considered a plausible source of the payment.
pub const MATCH_WINDOW_DAYS: i64 = 30;

/// Fuzzy matching accepts appointments whose collected cash is within this
/// fraction of the payment amount.
pub const AMOUNT_TOLERANCE: f64 = 0.10;

// ---------------------------------------------------------------------------
// Payer-name tokenization
// ---------------------------------------------------------------------------

/// Split a payer name into lowercase search tokens.
///
/// Splits on anything non-alphanumeric and drops single-character fragments
/// (initials and stray punctuation produce too many false contacts).
pub fn name_tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(String::from)
        .collect()
}

/// Whether `cash_collected` is close enough to the payment amount for a
/// fuzzy match, within [`AMOUNT_TOLERANCE`] of the payment.
pub fn amount_within_tolerance(cash_collected: f64, payment_amount: f64) -> bool {
    (cash_collected - payment_amount).abs() <= AMOUNT_TOLERANCE * payment_amount
}

/// Validate an incoming payment amount at the ingestion boundary.
pub fn validate_payment_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Payment amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A fuzzy-match candidate retained for manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub appointment_id: DbId,
    pub contact_name: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub cash_collected: Option<f64>,
}

/// The matcher's verdict for one payment.
///
/// `appointment_id` is `None` both for an ambiguous fuzzy result (candidates
/// non-empty, awaiting manual review) and for no match at all.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMatch {
    pub appointment_id: Option<DbId>,
    pub confidence: f64,
    pub method: &'static str,
    pub candidates: Vec<MatchCandidate>,
}

impl PaymentMatch {
    pub fn explicit(appointment_id: DbId) -> Self {
        Self {
            appointment_id: Some(appointment_id),
            confidence: CONFIDENCE_APPOINTMENT_ID,
            method: METHOD_APPOINTMENT_ID,
            candidates: Vec::new(),
        }
    }

    pub fn by_email(appointment_id: DbId) -> Self {
        Self {
            appointment_id: Some(appointment_id),
            confidence: CONFIDENCE_EMAIL,
            method: METHOD_EMAIL,
            candidates: Vec::new(),
        }
    }

    pub fn by_phone(appointment_id: DbId) -> Self {
        Self {
            appointment_id: Some(appointment_id),
            confidence: CONFIDENCE_PHONE,
            method: METHOD_PHONE,
            candidates: Vec::new(),
        }
    }

    pub fn by_name_amount(appointment_id: DbId) -> Self {
        Self {
            appointment_id: Some(appointment_id),
            confidence: CONFIDENCE_NAME_AMOUNT,
            method: METHOD_NAME_AMOUNT,
            candidates: Vec::new(),
        }
    }

    pub fn ambiguous(candidates: Vec<MatchCandidate>) -> Self {
        Self {
            appointment_id: None,
            confidence: CONFIDENCE_AMBIGUOUS,
            method: METHOD_NAME_AMOUNT,
            candidates,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            appointment_id: None,
            confidence: CONFIDENCE_NONE,
            method: METHOD_NONE,
            candidates: Vec::new(),
        }
    }

    /// True when the payment resolved to a single appointment.
    pub fn is_resolved(&self) -> bool {
        self.appointment_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_names_case_insensitively() {
        assert_eq!(name_tokens("John Smith"), vec!["john", "smith"]);
        assert_eq!(name_tokens("MARIA de-la-Cruz"), vec!["maria", "de", "la", "cruz"]);
    }

    #[test]
    fn drops_initials_and_punctuation() {
        assert_eq!(name_tokens("J. Smith"), vec!["smith"]);
        assert_eq!(name_tokens("  ***  "), Vec::<String>::new());
        assert_eq!(name_tokens(""), Vec::<String>::new());
    }

    #[test]
    fn tolerance_is_ten_percent_of_payment() {
        assert!(amount_within_tolerance(1000.0, 1000.0));
        assert!(amount_within_tolerance(1100.0, 1000.0));
        assert!(amount_within_tolerance(900.0, 1000.0));
        assert!(!amount_within_tolerance(1101.0, 1000.0));
        assert!(!amount_within_tolerance(899.0, 1000.0));
    }

    #[test]
    fn zero_payment_only_tolerates_zero() {
        assert!(amount_within_tolerance(0.0, 0.0));
        assert!(!amount_within_tolerance(1.0, 0.0));
    }

    #[test]
    fn rejects_non_positive_payment_amounts() {
        assert!(validate_payment_amount(250.0).is_ok());
        assert!(validate_payment_amount(0.0).is_err());
        assert!(validate_payment_amount(-10.0).is_err());
        assert!(validate_payment_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn explicit_match_has_full_confidence() {
        let m = PaymentMatch::explicit(7);
        assert_eq!(m.appointment_id, Some(7));
        assert_eq!(m.confidence, CONFIDENCE_APPOINTMENT_ID);
        assert_eq!(m.method, METHOD_APPOINTMENT_ID);
        assert!(m.is_resolved());
    }

    #[test]
    fn ambiguous_match_keeps_candidates_and_no_winner() {
        let candidates = vec![
            MatchCandidate {
                appointment_id: 1,
                contact_name: Some("John Smith".into()),
                scheduled_at: None,
                cash_collected: Some(500.0),
            },
            MatchCandidate {
                appointment_id: 2,
                contact_name: Some("John Smithers".into()),
                scheduled_at: None,
                cash_collected: Some(480.0),
            },
        ];
        let m = PaymentMatch::ambiguous(candidates.clone());
        assert_eq!(m.appointment_id, None);
        assert_eq!(m.confidence, CONFIDENCE_AMBIGUOUS);
        assert_eq!(m.method, METHOD_NAME_AMOUNT);
        assert_eq!(m.candidates, candidates);
        assert!(!m.is_resolved());
    }

    #[test]
    fn unmatched_has_zero_confidence() {
        let m = PaymentMatch::unmatched();
        assert_eq!(m.appointment_id, None);
        assert_eq!(m.confidence, CONFIDENCE_NONE);
        assert_eq!(m.method, METHOD_NONE);
        assert!(m.candidates.is_empty());
    }
}
