//! Live per-variant stock counter.

use common::{Money, VariantId};
use serde::{Deserialize, Serialize};

/// Live on-hand quantity and current price for one SKU variant.
///
/// This is the single shared-mutable resource in the system. The count only
/// changes through [`crate::UnitOfWork::apply_stock_delta`], which bumps
/// `version` on every change; holding a unit of work serializes the whole
/// read-check-write sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStockRecord {
    /// The variant this row belongs to.
    pub variant_id: VariantId,

    /// Human-facing SKU code, unique across variants.
    pub sku: String,

    /// Units currently sellable. Never negative, by type and by the
    /// underflow check in `apply_stock_delta`.
    pub on_hand: u32,

    /// Current catalog price. Line items snapshot it at add time.
    pub unit_price: Money,

    /// Bumped on every on-hand mutation.
    pub version: u64,
}

impl VariantStockRecord {
    /// Creates a new stock row.
    pub fn new(sku: impl Into<String>, unit_price: Money, on_hand: u32) -> Self {
        Self {
            variant_id: VariantId::new(),
            sku: sku.into(),
            on_hand,
            unit_price,
            version: 0,
        }
    }
}
