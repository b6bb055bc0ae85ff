//! Shared types for the ledger engine.
//!
//! Identifier newtypes keep the many UUID-keyed records from being mixed up
//! at call sites; `Money` keeps amounts in integer cents.

mod money;
mod types;

pub use money::Money;
pub use types::{ClientId, DocumentId, EntryId, LineItemId, VariantId};
