//! Read-only views over the ledger engine.
//!
//! Nothing in this crate mutates state: every query takes the store's read
//! lock, assembles its answer, and returns owned data. Consistency-critical
//! writes all live in the `domain` lifecycles.

mod availability;
mod documents;
mod stock;

pub use availability::AvailabilityQuery;
pub use documents::{DocumentQueries, DocumentWithLines};
pub use stock::{Reconciliation, SellThrough, StockQueries};
