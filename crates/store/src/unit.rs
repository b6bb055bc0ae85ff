//! Explicit unit of work.
//!
//! Every lifecycle operation reads, validates, and mutates through one
//! `UnitOfWork`. Opening one takes the store's write lock and clones the
//! tables into a scratch copy; all access goes to the scratch. `commit`
//! publishes the scratch under the still-held lock, and dropping without
//! commit discards it — an operation that bails out with `?` halfway through
//! leaves nothing observable, which is the atomicity contract the lifecycles
//! rely on.

use common::{DocumentId, Money, VariantId};
use tokio::sync::RwLockWriteGuard;

use crate::{
    DocumentRecord, HistoricEntry, LineItemRecord, MovementEntry, Result, StoreError, Tables,
    VariantStockRecord,
};

/// An exclusive, all-or-nothing transaction over the store.
pub struct UnitOfWork<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    scratch: Tables,
}

impl<'a> UnitOfWork<'a> {
    pub(crate) fn open(guard: RwLockWriteGuard<'a, Tables>) -> Self {
        let scratch = guard.clone();
        Self { guard, scratch }
    }

    /// Publishes every staged change.
    pub fn commit(self) {
        let Self { mut guard, scratch } = self;
        *guard = scratch;
    }

    /// Read access to the transaction's view of the tables, including its
    /// own uncommitted changes.
    pub fn tables(&self) -> &Tables {
        &self.scratch
    }

    /// Looks up a document in the transaction's view.
    pub fn document(&self, id: DocumentId) -> Result<&DocumentRecord> {
        self.scratch.document(id)
    }

    /// Looks up a stock row in the transaction's view.
    pub fn stock(&self, id: VariantId) -> Result<&VariantStockRecord> {
        self.scratch.stock(id)
    }

    /// Stages a new document.
    pub fn insert_document(&mut self, doc: DocumentRecord) {
        self.scratch.insert_document(doc);
    }

    /// Mutable access to a staged document.
    pub fn document_mut(&mut self, id: DocumentId) -> Result<&mut DocumentRecord> {
        self.scratch.document_mut(id)
    }

    /// Stages a new line item.
    pub fn insert_line_item(&mut self, line: LineItemRecord) {
        self.scratch.insert_line_item(line);
    }

    /// Stages a new stock row.
    pub fn insert_stock(&mut self, row: VariantStockRecord) {
        self.scratch.insert_stock(row);
    }

    /// Applies a signed delta to a variant's on-hand count.
    ///
    /// Rejects underflow and bumps the row's version. This is the only way
    /// on-hand changes.
    pub fn apply_stock_delta(&mut self, id: VariantId, delta: i64) -> Result<u32> {
        let row = self.scratch.stock_mut(id)?;
        let next = row.on_hand as i64 + delta;
        if next < 0 {
            return Err(StoreError::StockUnderflow {
                sku: row.sku.clone(),
                on_hand: row.on_hand,
                requested: delta.unsigned_abs() as u32,
            });
        }
        row.on_hand = next as u32;
        row.version += 1;
        Ok(row.on_hand)
    }

    /// Updates a variant's catalog price. Does not touch the stock version;
    /// line items keep their snapshots.
    pub fn set_unit_price(&mut self, id: VariantId, unit_price: Money) -> Result<()> {
        let row = self.scratch.stock_mut(id)?;
        row.unit_price = unit_price;
        Ok(())
    }

    /// Appends to the movement ledger.
    pub fn record_movement(&mut self, entry: MovementEntry) {
        self.scratch.push_movement(entry);
    }

    /// Appends to the historic-stock ledger.
    pub fn record_historic(&mut self, entry: HistoricEntry) {
        self.scratch.push_historic(entry);
    }
}
