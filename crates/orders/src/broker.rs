//! The order broker: estimate, prepare, confirm, cancel.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use skybroker_config::BrokerConfig;
use skybroker_core::{
    AreaPolygon, CostEstimate, GeometryError, LedgerEntry, LedgerError, LedgerStore, OrderStatus,
    PendingOrder, PriceError, PricedOrderRequest, TokenError,
};
use skybroker_guardrail::{GuardrailBreach, evaluate, format_budget_alert};

use crate::store::PendingStore;
use crate::token::{confirmation_code, mint_token};

/// Auto-expansion overshoots the order minimum slightly so a re-measured
/// area cannot land back under it.
const EXPANSION_HEADROOM: f64 = 1.02;

/// Why an order could not be prepared or confirmed.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Ordering is disabled; set enable_ordering = true to allow purchases")]
    OrderingDisabled,

    #[error("AOI is {area:.1} km², above the {max:.0} km² order maximum")]
    AreaTooLarge { area: f64, max: f64 },

    #[error("Order blocked by spending guardrails:\n{}", render_breaches(.0))]
    Guardrail(Vec<GuardrailBreach>),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

fn render_breaches(breaches: &[GuardrailBreach]) -> String {
    breaches
        .iter()
        .map(|b| format!("  - {b}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A priced, validated order before any guardrail check.
#[derive(Debug, Clone)]
pub struct OrderQuote {
    /// The AOI that would actually be ordered, after any minimum-area
    /// expansion.
    pub aoi: AreaPolygon,
    pub estimate: CostEstimate,
    /// The pre-expansion area, when expansion happened.
    pub expanded_from_km2: Option<f64>,
}

/// A minted pending order, awaiting human confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedOrder {
    pub token: String,
    /// What the human types back: `CONFIRM-` plus the token head.
    pub confirmation_code: String,
    pub archive_id: String,
    pub estimate: CostEstimate,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Pre-expansion area, when the AOI was below the order minimum.
    pub expanded_from_km2: Option<f64>,
    /// Post-order budget picture, for display alongside the code.
    pub budget_alert: String,
}

/// Receipt for a confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub token: String,
    pub archive_id: String,
    pub cost: f64,
    pub ledger_entry_id: String,
    pub confirmed_at: chrono::DateTime<chrono::Utc>,
}

/// Owns the pending-order store and enforces the two-phase purchase flow.
///
/// All state transitions and guardrail evaluations happen behind one lock,
/// so two racing orders cannot both be admitted against the same remaining
/// budget.
pub struct OrderBroker {
    config: BrokerConfig,
    ledger: Arc<dyn LedgerStore>,
    pending: Mutex<PendingStore>,
}

impl OrderBroker {
    /// Broker with a file-backed pending store at the configured path.
    pub fn open(config: BrokerConfig, ledger: Arc<dyn LedgerStore>) -> Self {
        let store = PendingStore::open(config.pending_orders_path());
        Self::with_store(config, ledger, store)
    }

    /// Broker with an in-memory pending store.
    pub fn in_memory(config: BrokerConfig, ledger: Arc<dyn LedgerStore>) -> Self {
        Self::with_store(config, ledger, PendingStore::in_memory())
    }

    pub fn with_store(
        config: BrokerConfig,
        ledger: Arc<dyn LedgerStore>,
        store: PendingStore,
    ) -> Self {
        Self {
            config,
            ledger,
            pending: Mutex::new(store),
        }
    }

    /// Validate and price an order without touching the ledger or minting
    /// anything. Safe to call freely.
    pub fn estimate(&self, request: &PricedOrderRequest) -> Result<OrderQuote, OrderError> {
        let area = skybroker_geo::area_km2(&request.polygon);
        if area <= 0.0 {
            return Err(GeometryError::DegenerateArea.into());
        }
        if area > self.config.max_order_area_km2 {
            return Err(OrderError::AreaTooLarge {
                area,
                max: self.config.max_order_area_km2,
            });
        }

        let (aoi, expanded_from_km2) = if area < self.config.min_order_area_km2 {
            let target = self.config.min_order_area_km2 * EXPANSION_HEADROOM;
            let expanded = skybroker_geo::expand_to_minimum_area(&request.polygon, target)?;
            tracing::info!(
                archive_id = %request.archive_id,
                original_km2 = area,
                target_km2 = target,
                "AOI below order minimum, auto-expanding"
            );
            (expanded, Some(area))
        } else {
            (request.polygon.clone(), None)
        };

        let priced_area = skybroker_geo::area_km2(&aoi);
        let estimate = skybroker_pricing::interpret(
            request.vendor_price,
            request.price_hint,
            priced_area,
            self.config.min_billable_area_km2,
        )?;

        Ok(OrderQuote {
            aoi,
            estimate,
            expanded_from_km2,
        })
    }

    /// Price the order, run the guardrails, and mint a pending order.
    ///
    /// Ledger reads, guardrail evaluation, and the store write share one
    /// critical section. A breach reports every violated limit and leaves
    /// no trace.
    pub async fn prepare(&self, request: &PricedOrderRequest) -> Result<PreparedOrder, OrderError> {
        if !self.config.enable_ordering {
            return Err(OrderError::OrderingDisabled);
        }

        let quote = self.estimate(request)?;

        let mut store = self.pending.lock().await;

        let spent_today = self.ledger.spent_today().await?;
        let total_spent = self.ledger.total_spent().await?;
        let limits = self.config.limits();
        let verdict = evaluate(quote.estimate.total, spent_today, total_spent, &limits);
        if !verdict.passed() {
            return Err(OrderError::Guardrail(verdict.breaches));
        }

        let token = mint_token();
        let code = confirmation_code(&token);
        let now = Utc::now();
        let expires_at = now + Duration::minutes(i64::from(self.config.order_ttl_minutes));

        let order = PendingOrder {
            token: token.clone(),
            archive_id: request.archive_id.clone(),
            aoi_wkt: quote.aoi.to_wkt(),
            estimate: quote.estimate.clone(),
            created_at: now,
            expires_at,
            status: OrderStatus::Pending,
            confirmed_at: None,
        };
        store.insert(order);
        store.persist()?;

        tracing::info!(
            archive_id = %request.archive_id,
            cost = quote.estimate.total,
            expires_at = %expires_at,
            "Pending order minted"
        );

        let budget_alert = format_budget_alert(
            total_spent + quote.estimate.total,
            limits.total,
            "Total (after this order)",
        );

        Ok(PreparedOrder {
            token,
            confirmation_code: code,
            archive_id: request.archive_id.clone(),
            estimate: quote.estimate,
            expires_at,
            expanded_from_km2: quote.expanded_from_km2,
            budget_alert,
        })
    }

    /// Exchange a token and its code for a confirmed, ledger-recorded
    /// order.
    ///
    /// The ledger append happens before the status flip: if the append
    /// fails the order stays pending and can be retried.
    pub async fn confirm(&self, token: &str, code: &str) -> Result<ConfirmedOrder, OrderError> {
        if !self.config.enable_ordering {
            return Err(OrderError::OrderingDisabled);
        }

        let mut store = self.pending.lock().await;

        let now = Utc::now();
        let order = store.get_mut(token).ok_or(TokenError::Unknown)?;

        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Confirmed => return Err(TokenError::AlreadyConfirmed.into()),
            OrderStatus::Expired => return Err(TokenError::Expired.into()),
            OrderStatus::Cancelled => return Err(TokenError::Cancelled.into()),
        }

        if order.is_expired_at(now) {
            order.status = OrderStatus::Expired;
            store.persist()?;
            return Err(TokenError::Expired.into());
        }

        if code != confirmation_code(token) {
            // Wrong code is not a state transition; the order stays pending
            return Err(TokenError::CodeMismatch.into());
        }

        let cost = order.estimate.total;
        let archive_id = order.archive_id.clone();
        let details = serde_json::json!({
            "token": order.token,
            "aoi_wkt": order.aoi_wkt,
            "price_per_km2": order.estimate.price_per_km2,
            "billable_area_km2": order.estimate.billable_area_km2,
            "explanation": order.estimate.explanation,
        });

        // A crash between the ledger append and the status write leaves the
        // order pending on disk. The ledger is the source of truth for
        // spend, so a replayed confirm must find the earlier entry by its
        // token instead of paying twice.
        let prior = self
            .ledger
            .entries()
            .await?
            .into_iter()
            .find(|e| e.details.get("token").and_then(|v| v.as_str()) == Some(token));

        let ledger_entry_id = match prior {
            Some(existing) => {
                tracing::warn!(
                    archive_id = %archive_id,
                    ledger_entry_id = %existing.id,
                    "Spend already recorded for this token; repairing order state"
                );
                existing.id
            }
            None => {
                // Spend is recorded first; only a durable append flips the
                // status
                let entry = LedgerEntry::new(archive_id.clone(), cost, details);
                self.ledger.append(entry).await?
            }
        };

        let order = store
            .get_mut(token)
            .ok_or_else(|| LedgerError::Storage("pending order vanished mid-confirm".into()))?;
        order.status = OrderStatus::Confirmed;
        order.confirmed_at = Some(now);
        store.persist()?;

        tracing::info!(
            archive_id = %archive_id,
            cost,
            ledger_entry_id = %ledger_entry_id,
            "Order confirmed"
        );

        Ok(ConfirmedOrder {
            token: token.to_string(),
            archive_id,
            cost,
            ledger_entry_id,
            confirmed_at: now,
        })
    }

    /// Cancel a pending order. Terminal states refuse.
    pub async fn cancel(&self, token: &str) -> Result<(), OrderError> {
        let mut store = self.pending.lock().await;

        let now = Utc::now();
        let order = store.get_mut(token).ok_or(TokenError::Unknown)?;

        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Confirmed => return Err(TokenError::AlreadyConfirmed.into()),
            OrderStatus::Expired => return Err(TokenError::Expired.into()),
            OrderStatus::Cancelled => return Err(TokenError::Cancelled.into()),
        }

        if order.is_expired_at(now) {
            order.status = OrderStatus::Expired;
            store.persist()?;
            return Err(TokenError::Expired.into());
        }

        order.status = OrderStatus::Cancelled;
        store.persist()?;
        tracing::info!(token, "Pending order cancelled");
        Ok(())
    }

    /// Look up an order by token, applying lazy expiry.
    pub async fn status(&self, token: &str) -> Result<PendingOrder, OrderError> {
        let mut store = self.pending.lock().await;

        let now = Utc::now();
        let order = store.get_mut(token).ok_or(TokenError::Unknown)?;
        if order.status == OrderStatus::Pending && order.is_expired_at(now) {
            order.status = OrderStatus::Expired;
            let snapshot = order.clone();
            store.persist()?;
            return Ok(snapshot);
        }
        Ok(order.clone())
    }

    #[cfg(test)]
    async fn force_expire(&self, token: &str) {
        let mut store = self.pending.lock().await;
        if let Some(order) = store.get_mut(token) {
            order.expires_at = Utc::now() - Duration::minutes(1);
        }
    }
}
