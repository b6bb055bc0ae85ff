//! Persistence layer for the ledger engine.
//!
//! This crate provides:
//! - Record definitions for documents, line items, stock rows, and the two
//!   append-only ledgers
//! - [`MemoryStore`], the in-memory backend holding every table behind one
//!   `RwLock`
//! - [`UnitOfWork`], the explicit transaction every lifecycle operation runs
//!   inside

mod document;
mod error;
mod ledger;
mod memory;
mod stock;
mod unit;

pub use document::{
    Disposition, DocumentKind, DocumentRecord, DocumentState, LineItemRecord, PaymentMethod,
};
pub use error::{Result, StoreError};
pub use ledger::{HistoricEntry, HistoricKind, MovementEntry, MovementKind};
pub use memory::{MemoryStore, MovementStream, StoreReader, Tables};
pub use stock::VariantStockRecord;
pub use unit::UnitOfWork;
