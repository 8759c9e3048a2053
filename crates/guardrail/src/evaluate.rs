//! The guardrail evaluator and budget severity bands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three hard spending limits, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendLimits {
    /// Maximum cost of a single order.
    pub per_order: f64,
    /// Maximum spend per UTC calendar day.
    pub daily: f64,
    /// Maximum all-time spend.
    pub total: f64,
}

/// One violated spending limit, with the numbers that violated it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardrailBreach {
    #[error("Order exceeds the per-order limit (${candidate:.2} > ${limit:.2})")]
    PerOrderExceeded { candidate: f64, limit: f64 },

    #[error(
        "Order would exceed the daily limit (${spent_today:.2} + ${candidate:.2} > ${limit:.2})"
    )]
    DailyExceeded {
        spent_today: f64,
        candidate: f64,
        limit: f64,
    },

    #[error(
        "Order would exceed the total budget (${total_spent:.2} + ${candidate:.2} > ${limit:.2})"
    )]
    TotalExceeded {
        total_spent: f64,
        candidate: f64,
        limit: f64,
    },
}

/// How much of a budget is consumed, for alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// < 50% spent
    Safe,
    /// 50–75% spent
    Warning,
    /// 75–90% spent
    Critical,
    /// 90–100% spent
    Danger,
    /// ≥ 100% spent
    Exceeded,
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Critical => "critical",
            BudgetStatus::Danger => "danger",
            BudgetStatus::Exceeded => "exceeded",
        };
        f.write_str(s)
    }
}

/// Classify spend against a limit. Returns the band and the percentage
/// spent. A non-positive limit classifies as Safe at 0%.
pub fn budget_status(spent: f64, limit: f64) -> (BudgetStatus, f64) {
    if limit <= 0.0 {
        return (BudgetStatus::Safe, 0.0);
    }

    let percentage = (spent / limit) * 100.0;
    let status = if percentage >= 100.0 {
        BudgetStatus::Exceeded
    } else if percentage >= 90.0 {
        BudgetStatus::Danger
    } else if percentage >= 75.0 {
        BudgetStatus::Critical
    } else if percentage >= 50.0 {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Safe
    };
    (status, percentage)
}

/// The evaluator's decision for one candidate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    /// Every violated limit. Empty means the order passes.
    pub breaches: Vec<GuardrailBreach>,

    /// Severity of total spend if this order were confirmed. Alerting
    /// only; never a failure cause.
    pub post_order_status: BudgetStatus,

    /// Post-order total spend as a percentage of the total limit.
    pub post_order_percent: f64,
}

impl GuardrailVerdict {
    pub fn passed(&self) -> bool {
        self.breaches.is_empty()
    }
}

/// Check a candidate cost against all three limits.
///
/// The checks are independent and all reported, with no short-circuiting,
/// so the caller can show every violated constraint at once.
pub fn evaluate(
    candidate_cost: f64,
    spent_today: f64,
    total_spent: f64,
    limits: &SpendLimits,
) -> GuardrailVerdict {
    let mut breaches = Vec::new();

    if candidate_cost > limits.per_order {
        breaches.push(GuardrailBreach::PerOrderExceeded {
            candidate: candidate_cost,
            limit: limits.per_order,
        });
    }

    if spent_today + candidate_cost > limits.daily {
        breaches.push(GuardrailBreach::DailyExceeded {
            spent_today,
            candidate: candidate_cost,
            limit: limits.daily,
        });
    }

    if total_spent + candidate_cost > limits.total {
        breaches.push(GuardrailBreach::TotalExceeded {
            total_spent,
            candidate: candidate_cost,
            limit: limits.total,
        });
    }

    let (post_order_status, post_order_percent) =
        budget_status(total_spent + candidate_cost, limits.total);

    if !breaches.is_empty() {
        tracing::warn!(
            candidate_cost,
            spent_today,
            total_spent,
            breach_count = breaches.len(),
            "Order blocked by spending guardrails"
        );
    }

    GuardrailVerdict {
        breaches,
        post_order_status,
        post_order_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SpendLimits {
        SpendLimits {
            per_order: 20.0,
            daily: 40.0,
            total: 40.0,
        }
    }

    #[test]
    fn within_all_limits_passes() {
        let verdict = evaluate(10.0, 0.0, 0.0, &limits());
        assert!(verdict.passed());
        assert!(verdict.breaches.is_empty());
    }

    #[test]
    fn per_order_breach_is_the_only_reason() {
        // $25 order against a $20 per-order limit with nothing spent:
        // daily (0 + 25 ≤ 40) and total (0 + 25 ≤ 40) must not be reported
        let verdict = evaluate(25.0, 0.0, 0.0, &limits());
        assert!(!verdict.passed());
        assert_eq!(verdict.breaches.len(), 1);
        assert!(matches!(
            verdict.breaches[0],
            GuardrailBreach::PerOrderExceeded { .. }
        ));
    }

    #[test]
    fn all_violations_reported_together() {
        let verdict = evaluate(25.0, 30.0, 30.0, &limits());
        assert_eq!(verdict.breaches.len(), 3);
        assert!(verdict
            .breaches
            .iter()
            .any(|b| matches!(b, GuardrailBreach::PerOrderExceeded { .. })));
        assert!(verdict
            .breaches
            .iter()
            .any(|b| matches!(b, GuardrailBreach::DailyExceeded { .. })));
        assert!(verdict
            .breaches
            .iter()
            .any(|b| matches!(b, GuardrailBreach::TotalExceeded { .. })));
    }

    #[test]
    fn fails_iff_a_hard_check_is_violated() {
        let cases: &[(f64, f64, f64)] = &[
            (5.0, 0.0, 0.0),
            (20.0, 20.0, 20.0),
            (21.0, 0.0, 0.0),
            (10.0, 35.0, 0.0),
            (10.0, 0.0, 35.0),
            (0.5, 39.9, 39.9),
        ];
        for &(cost, today, total) in cases {
            let verdict = evaluate(cost, today, total, &limits());
            let expected_fail = cost > 20.0 || today + cost > 40.0 || total + cost > 40.0;
            assert_eq!(
                !verdict.passed(),
                expected_fail,
                "cost={cost} today={today} total={total}"
            );
        }
    }

    #[test]
    fn exact_limit_is_allowed() {
        // Checks use strict greater-than: hitting the limit exactly passes
        let verdict = evaluate(20.0, 20.0, 20.0, &limits());
        assert!(verdict.passed());
    }

    #[test]
    fn severity_never_causes_failure() {
        // 95% of total budget post-order: danger band, but no breach
        let verdict = evaluate(18.0, 0.0, 20.0, &limits());
        assert!(verdict.passed());
        assert_eq!(verdict.post_order_status, BudgetStatus::Danger);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(budget_status(0.0, 100.0).0, BudgetStatus::Safe);
        assert_eq!(budget_status(49.9, 100.0).0, BudgetStatus::Safe);
        assert_eq!(budget_status(50.0, 100.0).0, BudgetStatus::Warning);
        assert_eq!(budget_status(75.0, 100.0).0, BudgetStatus::Critical);
        assert_eq!(budget_status(90.0, 100.0).0, BudgetStatus::Danger);
        assert_eq!(budget_status(100.0, 100.0).0, BudgetStatus::Exceeded);
        assert_eq!(budget_status(150.0, 100.0).0, BudgetStatus::Exceeded);
    }

    #[test]
    fn non_positive_limit_is_safe() {
        let (status, pct) = budget_status(10.0, 0.0);
        assert_eq!(status, BudgetStatus::Safe);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn breach_messages_enumerate_numbers() {
        let verdict = evaluate(25.0, 30.0, 0.0, &limits());
        let messages: Vec<String> = verdict.breaches.iter().map(|b| b.to_string()).collect();
        assert!(messages[0].contains("$25.00") && messages[0].contains("$20.00"));
        assert!(messages[1].contains("$30.00") && messages[1].contains("$40.00"));
    }

    #[test]
    fn breach_serializes_with_kind_tag() {
        let breach = GuardrailBreach::DailyExceeded {
            spent_today: 30.0,
            candidate: 15.0,
            limit: 40.0,
        };
        let json = serde_json::to_string(&breach).unwrap();
        assert!(json.contains("\"kind\":\"daily_exceeded\""));
        let back: GuardrailBreach = serde_json::from_str(&json).unwrap();
        assert_eq!(back, breach);
    }
}
