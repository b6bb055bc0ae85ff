//! Append-only ledgers.
//!
//! The movement ledger records every stock-affecting event and is the system
//! of record for reconciling the live counter. The historic-stock ledger
//! tracks inbound provisioning (initial stock and manual adjustments) and
//! feeds sell-through reporting; it is independent of sales.

use chrono::{DateTime, Utc};
use common::{DocumentId, EntryId, LineItemId, VariantId};
use serde::{Deserialize, Serialize};

/// What kind of stock-affecting event a movement entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Stock deducted when a sales order was confirmed.
    SaleDeduction,

    /// Stock restored when a confirmed order was cancelled.
    CancelReversal,

    /// Stock restored when a return was approved fit for resale.
    ReturnRestock,

    /// Write-off of scrapped returned goods; ledger only, no stock effect.
    ScrapWriteoff,

    /// Manual inventory adjustment upwards.
    AdjustUp,

    /// Manual inventory adjustment downwards.
    AdjustDown,
}

impl MovementKind {
    /// The on-hand delta this kind of entry represents for `quantity` units.
    pub fn signed(&self, quantity: u32) -> i64 {
        let q = quantity as i64;
        match self {
            MovementKind::SaleDeduction | MovementKind::AdjustDown => -q,
            MovementKind::CancelReversal | MovementKind::ReturnRestock | MovementKind::AdjustUp => {
                q
            }
            MovementKind::ScrapWriteoff => 0,
        }
    }
}

/// One entry in the movement ledger. Created once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementEntry {
    /// Unique entry identifier.
    pub id: EntryId,

    /// The variant whose stock the event concerns.
    pub variant_id: VariantId,

    /// The document that caused the event, if any. Manual adjustments have
    /// no document.
    pub document_id: Option<DocumentId>,

    /// The specific line item, if any.
    pub line_item_id: Option<LineItemId>,

    /// Event kind.
    pub kind: MovementKind,

    /// Units moved; always positive, the sign lives in `kind`.
    pub quantity: u32,

    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl MovementEntry {
    /// Creates a new movement entry stamped with the current time.
    pub fn new(
        variant_id: VariantId,
        document_id: Option<DocumentId>,
        line_item_id: Option<LineItemId>,
        kind: MovementKind,
        quantity: u32,
    ) -> Self {
        Self {
            id: EntryId::new(),
            variant_id,
            document_id,
            line_item_id,
            kind,
            quantity,
            recorded_at: Utc::now(),
        }
    }

    /// The on-hand delta this entry represents.
    pub fn signed(&self) -> i64 {
        self.kind.signed(self.quantity)
    }
}

/// What kind of inbound-inventory event a historic entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoricKind {
    /// Stock present when the variant was first registered.
    Initial,

    /// Manual adjustment that added units.
    AdjustUp,

    /// Manual adjustment that removed units.
    AdjustDown,
}

/// One entry in the historic-stock ledger. Created once, never updated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricEntry {
    /// Unique entry identifier.
    pub id: EntryId,

    /// The variant whose baseline inventory changed.
    pub variant_id: VariantId,

    /// Signed unit delta of this event.
    pub delta: i64,

    /// Cumulative baseline after this event; floors at zero.
    pub cumulative_after: u32,

    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,

    /// Free-form reason ("initial stock", "yearly recount", ...).
    pub reason: String,

    /// Event kind.
    pub kind: HistoricKind,
}

impl HistoricEntry {
    /// Creates a new historic entry stamped with the current time.
    pub fn new(
        variant_id: VariantId,
        kind: HistoricKind,
        delta: i64,
        cumulative_after: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            variant_id,
            delta,
            cumulative_after,
            recorded_at: Utc::now(),
            reason: reason.into(),
            kind,
        }
    }
}
