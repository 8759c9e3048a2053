//! Order request, cost estimate, and pending-order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::polygon::AreaPolygon;

/// How the caller believes a vendor price should be read.
///
/// Vendor search results carry a bare number; whether it means $/km² or a
/// flat total is not reliably annotated upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceHint {
    /// Price is per km² of billable area.
    PerArea,
    /// Price is a flat total for the whole order.
    Flat,
    /// No reliable signal either way.
    Unknown,
}

/// A candidate order as submitted by the search/pricing collaborator.
/// Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedOrderRequest {
    /// Area of interest.
    pub polygon: AreaPolygon,

    /// Opaque vendor archive identifier.
    pub archive_id: String,

    /// Vendor-quoted price; unit per `price_hint`.
    pub vendor_price: f64,

    /// Unit disambiguation hint.
    pub price_hint: PriceHint,
}

impl PricedOrderRequest {
    pub fn new(
        polygon: AreaPolygon,
        archive_id: impl Into<String>,
        vendor_price: f64,
        price_hint: PriceHint,
    ) -> Self {
        Self {
            polygon,
            archive_id: archive_id.into(),
            vendor_price,
            price_hint,
        }
    }
}

/// A fully interpreted price for an order. Derived, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Per-km² rate (back-computed for display when the price was flat).
    pub price_per_km2: f64,

    /// Total cost of the order in USD.
    pub total: f64,

    /// Measured AOI area in km².
    pub actual_area_km2: f64,

    /// Area actually charged for; at least the provider minimum.
    pub billable_area_km2: f64,

    /// Human-readable derivation for audit and UX.
    pub explanation: String,
}

/// Lifecycle state of a pending order.
///
/// `pending` is the only non-terminal state; once left it can never be
/// re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Expired,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Expired => "expired",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A priced order awaiting human confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Single-use, unguessable confirmation token.
    pub token: String,

    /// Vendor archive identifier.
    pub archive_id: String,

    /// The AOI actually being ordered (after any minimum-area expansion),
    /// in WKT.
    pub aoi_wkt: String,

    /// Cost estimate the guardrail check approved.
    pub estimate: CostEstimate,

    pub created_at: DateTime<Utc>,

    /// After this instant the order can only expire, never confirm.
    pub expires_at: DateTime<Utc>,

    pub status: OrderStatus,

    /// Set exactly once, on the pending → confirmed transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl PendingOrder {
    /// Whether the TTL has elapsed at `now`. Confirmation must happen
    /// strictly before `expires_at`; the boundary instant is already
    /// expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::AreaPolygon;
    use chrono::Duration;

    #[test]
    fn status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn price_hint_serializes_snake_case() {
        let json = serde_json::to_string(&PriceHint::PerArea).unwrap();
        assert_eq!(json, "\"per_area\"");
        let back: PriceHint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PriceHint::PerArea);
    }

    #[test]
    fn pending_order_expiry_check() {
        let now = Utc::now();
        let order = PendingOrder {
            token: "tok".into(),
            archive_id: "archive-1".into(),
            aoi_wkt: "POLYGON((0 0, 1 0, 1 1, 0 0))".into(),
            estimate: CostEstimate {
                price_per_km2: 2.0,
                total: 50.0,
                actual_area_km2: 3.2,
                billable_area_km2: 25.0,
                explanation: String::new(),
            },
            created_at: now,
            expires_at: now + Duration::minutes(5),
            status: OrderStatus::Pending,
            confirmed_at: None,
        };
        assert!(!order.is_expired_at(now));
        assert!(!order.is_expired_at(now + Duration::minutes(5) - Duration::seconds(1)));
        // The deadline itself is too late
        assert!(order.is_expired_at(now + Duration::minutes(5)));
        assert!(order.is_expired_at(now + Duration::minutes(6)));
    }

    #[test]
    fn request_roundtrip_json() {
        let polygon = AreaPolygon::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1))").unwrap();
        let req = PricedOrderRequest::new(polygon, "archive-9", 2.0, PriceHint::Unknown);
        let json = serde_json::to_string(&req).unwrap();
        let back: PricedOrderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.archive_id, "archive-9");
        assert_eq!(back.price_hint, PriceHint::Unknown);
    }
}
