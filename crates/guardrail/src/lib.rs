//! Budget guardrails: hard, locally-enforced spending limits.
//!
//! These limits are independent of (and in addition to) whatever budget the
//! upstream imagery vendor enforces on the account. The evaluator is a pure
//! function over the candidate cost and the ledger's current totals; the
//! severity bands exist purely for alerting and never cause a failure by
//! themselves.

pub mod alert;
pub mod evaluate;

pub use alert::{format_budget_alert, format_spending_summary};
pub use evaluate::{BudgetStatus, GuardrailBreach, GuardrailVerdict, SpendLimits, evaluate};
