//! Two-phase order confirmation for satellite imagery purchases.
//!
//! Every purchase goes through prepare → confirm. `prepare` prices the
//! order, runs it past the spending guardrails, and mints a short-lived
//! confirmation token; `confirm` exchanges the token (plus a human-typed
//! code) for a ledger entry. Nothing is spent until confirm succeeds.

mod broker;
mod store;
mod token;

pub use broker::{ConfirmedOrder, OrderBroker, OrderError, OrderQuote, PreparedOrder};
pub use store::PendingStore;
pub use token::{confirmation_code, mint_token};
