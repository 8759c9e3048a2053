//! Core domain types and traits for the skybroker order-safety subsystem.
//!
//! Everything that more than one crate needs lives here: the AOI polygon
//! type with its WKT codec, the order request/estimate/pending-order shapes,
//! the ledger entry and `LedgerStore` trait, and the error taxonomy.

pub mod error;
pub mod ledger;
pub mod order;
pub mod polygon;

pub use error::{Error, GeometryError, LedgerError, PriceError, Result, TokenError};
pub use ledger::{LedgerEntry, LedgerStore};
pub use order::{CostEstimate, OrderStatus, PendingOrder, PriceHint, PricedOrderRequest};
pub use polygon::AreaPolygon;
