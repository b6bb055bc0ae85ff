//! Lifecycle engine for the order-and-inventory ledger.
//!
//! This crate provides:
//! - [`OrderLifecycle`]: draft → documented → confirmed → delivered, with
//!   cancellation of confirmed orders
//! - [`ReturnLifecycle`]: returns of delivered goods, approved fit (restock)
//!   or scrap (write-off)
//! - the return authorization calculator, which caps returns per client and
//!   variant at the quantity ever delivered
//! - [`Catalog`]: variant registration and manual stock adjustment, the only
//!   writers of the historic-stock ledger
//! - [`ClientDirectory`]: the lookup seam to the external client registry

pub mod catalog;
pub mod directory;
pub mod order;
pub mod returns;

pub use catalog::{Catalog, CatalogError};
pub use directory::{Client, ClientDirectory, InMemoryDirectory};
pub use order::{OrderError, OrderLifecycle};
pub use returns::{ReturnAvailability, ReturnError, ReturnLifecycle, availability};
