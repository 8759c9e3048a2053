//! Price interpretation for vendor-quoted imagery prices.
//!
//! Vendor search results carry a bare number that is usually a $/km² rate
//! but occasionally a flat total, with no reliable unit annotation. This
//! crate resolves that ambiguity against the measured AOI area and folds in
//! the provider's minimum-billable-area rule.

use skybroker_core::error::PriceError;
use skybroker_core::order::{CostEstimate, PriceHint};

/// Provider minimum billable area in km². Orders under this are charged as
/// if they covered it.
pub const DEFAULT_MIN_BILLABLE_KM2: f64 = 25.0;

/// Below this price, a quote for a non-trivial area is implausible as a
/// flat total and is read as a per-km² rate.
const SMALL_PRICE_THRESHOLD: f64 = 10.0;

/// Area above which the small-price heuristic applies.
const SMALL_PRICE_AREA_KM2: f64 = 5.0;

/// Interpret a vendor price into a full cost estimate.
///
/// An explicit `PriceHint::Flat` is taken at face value; the per-km² rate
/// is then back-computed for display only. Everything else is read as a
/// per-km² rate with `billable = max(area, minimum)`.
///
/// For ambiguous quotes, a price under $10 against an area over 5 km² is
/// forced to the per-km² reading; flat totals for large areas are
/// implausible at that price point. This is a documented best-effort guess,
/// not a guarantee; the vendor's actual pricing contract is unannotated.
pub fn interpret(
    vendor_price: f64,
    hint: PriceHint,
    area_km2: f64,
    min_billable_km2: f64,
) -> Result<CostEstimate, PriceError> {
    if vendor_price <= 0.0 {
        return Err(PriceError::NonPositivePrice(vendor_price));
    }
    if area_km2 <= 0.0 {
        return Err(PriceError::NonPositiveArea(area_km2));
    }

    let billable_area_km2 = area_km2.max(min_billable_km2);

    let estimate = match hint {
        PriceHint::Flat => {
            let price_per_km2 = vendor_price / area_km2;
            CostEstimate {
                price_per_km2,
                total: vendor_price,
                actual_area_km2: area_km2,
                billable_area_km2,
                explanation: format!(
                    "${vendor_price:.2} flat total (≈ ${price_per_km2:.2}/km² over {area_km2:.1} km²)"
                ),
            }
        }
        PriceHint::PerArea | PriceHint::Unknown => {
            if hint == PriceHint::Unknown
                && vendor_price < SMALL_PRICE_THRESHOLD
                && area_km2 > SMALL_PRICE_AREA_KM2
            {
                tracing::info!(
                    vendor_price,
                    area_km2,
                    "Ambiguous price is small for this area; reading as per-km² rate"
                );
            }
            per_area_estimate(vendor_price, area_km2, min_billable_km2)
        }
    };

    tracing::debug!(
        vendor_price,
        per_km2 = estimate.price_per_km2,
        total = estimate.total,
        "Interpreted vendor price"
    );
    Ok(estimate)
}

fn per_area_estimate(price_per_km2: f64, area_km2: f64, min_billable_km2: f64) -> CostEstimate {
    let billable_area_km2 = area_km2.max(min_billable_km2);
    let explanation = if area_km2 < min_billable_km2 {
        format!("${price_per_km2:.2}/km² × {min_billable_km2} km² (minimum billing)")
    } else {
        format!("${price_per_km2:.2}/km² × {area_km2:.1} km²")
    };
    CostEstimate {
        price_per_km2,
        total: price_per_km2 * billable_area_km2,
        actual_area_km2: area_km2,
        billable_area_km2,
        explanation,
    }
}

/// Whether a batch of vendor quotes looks ambiguous enough to warrant
/// asking the caller to double-check units before ordering.
///
/// Flags price sets that are all round hundreds (likely flat totals) and
/// any quote over $50/km² (unusually high for a rate).
pub fn needs_clarification(prices: &[f64]) -> bool {
    if prices.is_empty() {
        return false;
    }

    // Every quote must itself be a positive round hundred for this signal;
    // a zero or unpriced entry in the set breaks the pattern
    let round_hundreds = prices
        .iter()
        .filter(|p| **p > 0.0 && (**p % 100.0).abs() < f64::EPSILON)
        .count();
    if round_hundreds == prices.len() && prices.len() > 2 {
        return true;
    }

    prices.iter().any(|p| *p > 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_area_is_billed_at_minimum() {
        // area 3.2 km², minimum 25 km², $2/km² → $50 total
        let est = interpret(2.0, PriceHint::PerArea, 3.2, 25.0).unwrap();
        assert!((est.total - 50.0).abs() < 1e-10);
        assert!((est.billable_area_km2 - 25.0).abs() < 1e-10);
        assert!((est.actual_area_km2 - 3.2).abs() < 1e-10);
        assert!(est.explanation.contains("25 km²"));
        assert!(est.explanation.contains("minimum billing"));
    }

    #[test]
    fn large_area_is_billed_at_actual() {
        let est = interpret(2.0, PriceHint::PerArea, 100.0, 25.0).unwrap();
        assert!((est.total - 200.0).abs() < 1e-10);
        assert!((est.billable_area_km2 - 100.0).abs() < 1e-10);
        assert!(est.explanation.contains("100.0 km²"));
    }

    #[test]
    fn flat_hint_taken_at_face_value() {
        let est = interpret(500.0, PriceHint::Flat, 40.0, 25.0).unwrap();
        assert!((est.total - 500.0).abs() < 1e-10);
        assert!((est.price_per_km2 - 12.5).abs() < 1e-10);
        assert!(est.explanation.contains("flat total"));
    }

    #[test]
    fn ambiguous_small_price_read_as_rate() {
        // $3 "total" for 80 km² is implausible; per-km² reading gives $240
        let est = interpret(3.0, PriceHint::Unknown, 80.0, 25.0).unwrap();
        assert!((est.total - 240.0).abs() < 1e-10);
        assert!((est.price_per_km2 - 3.0).abs() < 1e-10);
    }

    #[test]
    fn ambiguous_default_is_per_area() {
        let est = interpret(20.0, PriceHint::Unknown, 30.0, 25.0).unwrap();
        assert!((est.total - 600.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(matches!(
            interpret(0.0, PriceHint::PerArea, 10.0, 25.0),
            Err(PriceError::NonPositivePrice(_))
        ));
        assert!(matches!(
            interpret(2.0, PriceHint::PerArea, 0.0, 25.0),
            Err(PriceError::NonPositiveArea(_))
        ));
    }

    #[test]
    fn exactly_minimum_area_has_no_minimum_note() {
        let est = interpret(2.0, PriceHint::PerArea, 25.0, 25.0).unwrap();
        assert!((est.total - 50.0).abs() < 1e-10);
        assert!(!est.explanation.contains("minimum billing"));
    }

    #[test]
    fn clarification_on_round_hundreds() {
        assert!(needs_clarification(&[100.0, 500.0, 1000.0]));
    }

    #[test]
    fn zero_price_breaks_round_hundreds_pattern() {
        // A zero in the set disqualifies the all-round-hundreds signal;
        // cheap non-round quotes alongside it stay unflagged
        assert!(!needs_clarification(&[0.0, 2.5, 12.0, 30.0]));
        // The remaining quotes can still trip the high-rate check
        assert!(needs_clarification(&[0.0, 100.0, 200.0]));
    }

    #[test]
    fn clarification_on_high_rate() {
        assert!(needs_clarification(&[55.0]));
        assert!(!needs_clarification(&[2.0, 12.5, 30.0]));
    }

    #[test]
    fn no_clarification_for_empty() {
        assert!(!needs_clarification(&[]));
    }
}
