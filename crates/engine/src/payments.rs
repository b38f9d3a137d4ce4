//! Payment ingestion pipeline: match resolution, sale persistence, and
//! commission release.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use revops_core::commission::{
    calculate_commission, release_status_for, round_to_cents, validate_commission_inputs,
};
use revops_core::payment_matching::{
    amount_within_tolerance, name_tokens, MatchCandidate, PaymentMatch, CONFIDENCE_MANUAL,
    MATCH_WINDOW_DAYS, METHOD_MANUAL,
};
use revops_core::types::DbId;
use revops_db::models::commission::{Commission, CreateCommission};
use revops_db::models::sale::{CreateSale, Sale};
use revops_db::repositories::{AppointmentRepo, CloserRepo, CommissionRepo, ContactRepo, SaleRepo};

// ---------------------------------------------------------------------------
// Payment data
// ---------------------------------------------------------------------------

/// A normalized incoming payment event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentData {
    pub amount: f64,
    /// Explicit appointment link, e.g. from payment-link metadata.
    pub appointment_id: Option<DbId>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    /// Payment-processor reference (charge / transaction id).
    pub external_id: Option<String>,
}

/// What ingestion produced: the stored sale (match metadata included) and
/// the commission, when the match was commissionable.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOutcome {
    pub sale: Sale,
    pub commission: Option<Commission>,
}

// ---------------------------------------------------------------------------
// Match resolution
// ---------------------------------------------------------------------------

/// Resolve a payment to an appointment, trying strategies in strict
/// priority order and stopping at the first success.
///
/// A multi-candidate fuzzy result is returned as ambiguous with the
/// candidates attached; it is never narrowed arbitrarily.
pub async fn find_appointment_for_payment(
    pool: &PgPool,
    company_id: DbId,
    payment: &PaymentData,
) -> Result<PaymentMatch, sqlx::Error> {
    let window_start = Utc::now() - Duration::days(MATCH_WINDOW_DAYS);

    // 1. Explicit link. A dangling or cross-tenant id falls through to the
    // identity strategies rather than failing the ingestion.
    if let Some(appointment_id) = payment.appointment_id {
        if let Some(appointment) =
            AppointmentRepo::find_for_company(pool, company_id, appointment_id).await?
        {
            return Ok(PaymentMatch::explicit(appointment.id));
        }
        tracing::warn!(
            company_id,
            appointment_id,
            "payment references an unknown appointment, trying identity matching"
        );
    }

    // 2. Contact email.
    if let Some(email) = payment.email.as_deref().filter(|e| !e.trim().is_empty()) {
        if let Some(contact) = ContactRepo::find_by_email(pool, company_id, email).await? {
            if let Some(appointment) =
                AppointmentRepo::latest_signed_for_contact(pool, company_id, contact.id, window_start)
                    .await?
            {
                return Ok(PaymentMatch::by_email(appointment.id));
            }
        }
    }

    // 3. Contact phone.
    if let Some(phone) = payment.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if let Some(contact) = ContactRepo::find_by_phone(pool, company_id, phone).await? {
            if let Some(appointment) =
                AppointmentRepo::latest_signed_for_contact(pool, company_id, contact.id, window_start)
                    .await?
            {
                return Ok(PaymentMatch::by_phone(appointment.id));
            }
        }
    }

    // 4. Fuzzy payer name + amount.
    if let Some(name) = payment.name.as_deref() {
        let tokens = name_tokens(name);
        let contacts = ContactRepo::find_by_name_tokens(pool, company_id, &tokens).await?;
        if !contacts.is_empty() {
            let contact_ids: Vec<DbId> = contacts.iter().map(|c| c.id).collect();
            let signed =
                AppointmentRepo::signed_for_contacts(pool, company_id, &contact_ids, window_start)
                    .await?;

            let candidates: Vec<MatchCandidate> = signed
                .iter()
                .filter(|a| {
                    a.cash_collected
                        .is_some_and(|cash| amount_within_tolerance(cash, payment.amount))
                })
                .map(|a| MatchCandidate {
                    appointment_id: a.id,
                    contact_name: contacts
                        .iter()
                        .find(|c| Some(c.id) == a.contact_id)
                        .and_then(|c| c.full_name.clone()),
                    scheduled_at: a.scheduled_at,
                    cash_collected: a.cash_collected,
                })
                .collect();

            match candidates.as_slice() {
                [] => {}
                [only] => return Ok(PaymentMatch::by_name_amount(only.appointment_id)),
                _ => return Ok(PaymentMatch::ambiguous(candidates)),
            }
        }
    }

    // 5. Nothing fits; the sale lands in the manual review queue.
    Ok(PaymentMatch::unmatched())
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Ingest a payment: resolve the match, persist the sale, and release
/// commission when the match is commissionable.
pub async fn ingest_payment(
    pool: &PgPool,
    company_id: DbId,
    payment: &PaymentData,
) -> Result<PaymentOutcome, sqlx::Error> {
    let matched = find_appointment_for_payment(pool, company_id, payment).await?;
    tracing::info!(
        company_id,
        method = matched.method,
        confidence = matched.confidence,
        appointment_id = matched.appointment_id,
        "payment match resolved"
    );

    let candidates_json = (!matched.candidates.is_empty())
        .then(|| serde_json::to_value(&matched.candidates).ok())
        .flatten();

    let sale = SaleRepo::create(
        pool,
        company_id,
        &CreateSale {
            appointment_id: matched.appointment_id,
            amount: payment.amount,
            customer_email: payment.email.clone(),
            customer_phone: payment.phone.clone(),
            customer_name: payment.name.clone(),
            matched_by: Some(matched.method.to_string()),
            match_confidence: Some(matched.confidence),
            manually_matched: false,
            match_candidates: candidates_json,
            external_id: payment.external_id.clone(),
        },
    )
    .await?;

    let commission = match matched.appointment_id {
        Some(appointment_id) => {
            release_commission(pool, company_id, &sale, appointment_id).await?
        }
        None => None,
    };

    Ok(PaymentOutcome { sale, commission })
}

/// Resolve an unmatched or ambiguous sale by hand. Records the manual
/// method at full confidence and releases commission exactly as the
/// automatic path would have. Returns `None` when the sale is gone.
pub async fn manually_match_sale(
    pool: &PgPool,
    company_id: DbId,
    sale_id: DbId,
    appointment_id: DbId,
) -> Result<Option<PaymentOutcome>, sqlx::Error> {
    let Some(sale) =
        SaleRepo::set_match(pool, sale_id, appointment_id, METHOD_MANUAL, CONFIDENCE_MANUAL, true)
            .await?
    else {
        return Ok(None);
    };

    let commission = release_commission(pool, company_id, &sale, appointment_id).await?;
    Ok(Some(PaymentOutcome { sale, commission }))
}

// ---------------------------------------------------------------------------
// Commission release
// ---------------------------------------------------------------------------

/// Create the commission a matched sale entitles its closer to.
///
/// Not every match is commissionable: the appointment needs an assigned
/// closer and a usable sale value. When the appointment has no recorded
/// total price, the payment amount stands in for it (full release). An
/// existing commission for the sale is returned as-is so re-matching stays
/// idempotent.
async fn release_commission(
    pool: &PgPool,
    company_id: DbId,
    sale: &Sale,
    appointment_id: DbId,
) -> Result<Option<Commission>, sqlx::Error> {
    if let Some(existing) = CommissionRepo::find_by_sale(pool, sale.id).await? {
        return Ok(Some(existing));
    }

    let Some(appointment) =
        AppointmentRepo::find_for_company(pool, company_id, appointment_id).await?
    else {
        tracing::warn!(company_id, appointment_id, "matched appointment vanished, no commission");
        return Ok(None);
    };
    let Some(closer_id) = appointment.closer_id else {
        tracing::debug!(appointment_id, "appointment has no closer, no commission");
        return Ok(None);
    };
    let Some(closer) = CloserRepo::find_by_id(pool, closer_id).await? else {
        tracing::warn!(closer_id, "closer missing for appointment, no commission");
        return Ok(None);
    };

    let sale_amount = appointment.total_price.unwrap_or(sale.amount);
    if let Err(error) = validate_commission_inputs(sale_amount, closer.commission_rate) {
        tracing::warn!(sale_id = sale.id, closer_id, %error, "commission inputs invalid, skipping");
        return Ok(None);
    }

    let breakdown = calculate_commission(sale_amount, closer.commission_rate, Some(sale.amount));
    let total = round_to_cents(breakdown.total);
    let released = round_to_cents(breakdown.released);

    let commission = CommissionRepo::create(
        pool,
        company_id,
        &CreateCommission {
            sale_id: sale.id,
            closer_id,
            rate: closer.commission_rate,
            total_amount: total,
            released_amount: released,
            release_status: release_status_for(total, released).to_string(),
        },
    )
    .await?;

    tracing::info!(
        sale_id = sale.id,
        closer_id,
        total_amount = commission.total_amount,
        released_amount = commission.released_amount,
        release_status = %commission.release_status,
        "commission released"
    );
    Ok(Some(commission))
}
