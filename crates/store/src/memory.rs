use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use common::{ClientId, DocumentId, VariantId};
use futures_util::{Stream, stream};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    DocumentRecord, HistoricEntry, LineItemRecord, MovementEntry, Result, StoreError, UnitOfWork,
    VariantStockRecord,
};

/// Ordered stream over the movement ledger.
pub type MovementStream = Pin<Box<dyn Stream<Item = MovementEntry> + Send>>;

/// All persisted tables.
///
/// Stock rows are a keyed map; documents, line items, and the two ledgers
/// are insertion-ordered vectors filtered by id or foreign key, which keeps
/// the ledgers structurally append-only and listing order deterministic.
#[derive(Clone, Default)]
pub struct Tables {
    documents: Vec<DocumentRecord>,
    line_items: Vec<LineItemRecord>,
    stock: HashMap<VariantId, VariantStockRecord>,
    movements: Vec<MovementEntry>,
    historic: Vec<HistoricEntry>,
}

// Read accessors, shared by the unit of work and the read path.
impl Tables {
    /// Looks up a document.
    pub fn document(&self, id: DocumentId) -> Result<&DocumentRecord> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .ok_or(StoreError::DocumentNotFound { document_id: id })
    }

    /// Line items of one document, in insertion order.
    pub fn line_items_for(&self, id: DocumentId) -> Vec<LineItemRecord> {
        self.line_items
            .iter()
            .filter(|l| l.document_id == id)
            .cloned()
            .collect()
    }

    /// All documents of one client, oldest first.
    pub fn documents_for_client(&self, client_id: ClientId) -> Vec<DocumentRecord> {
        self.documents
            .iter()
            .filter(|d| d.client_id == client_id)
            .cloned()
            .collect()
    }

    /// Every document in the store, oldest first.
    pub fn all_documents(&self) -> Vec<DocumentRecord> {
        self.documents.clone()
    }

    /// Looks up a variant's stock row.
    pub fn stock(&self, id: VariantId) -> Result<&VariantStockRecord> {
        self.stock
            .get(&id)
            .ok_or(StoreError::VariantNotFound { variant_id: id })
    }

    /// Looks up a stock row by SKU.
    pub fn stock_by_sku(&self, sku: &str) -> Option<&VariantStockRecord> {
        self.stock.values().find(|s| s.sku == sku)
    }

    /// The whole movement ledger, in append order.
    pub fn movements(&self) -> &[MovementEntry] {
        &self.movements
    }

    /// Movement entries of one variant, in append order.
    pub fn movements_for(&self, variant_id: VariantId) -> Vec<MovementEntry> {
        self.movements
            .iter()
            .filter(|m| m.variant_id == variant_id)
            .cloned()
            .collect()
    }

    /// The whole historic-stock ledger, in append order.
    pub fn historic(&self) -> &[HistoricEntry] {
        &self.historic
    }

    /// Historic entries of one variant, in append order.
    pub fn historic_for(&self, variant_id: VariantId) -> Vec<HistoricEntry> {
        self.historic
            .iter()
            .filter(|h| h.variant_id == variant_id)
            .cloned()
            .collect()
    }

    /// Cumulative baseline after the variant's latest historic entry.
    pub fn last_cumulative(&self, variant_id: VariantId) -> Option<u32> {
        self.historic
            .iter()
            .rev()
            .find(|h| h.variant_id == variant_id)
            .map(|h| h.cumulative_after)
    }
}

// Mutators, reachable only through a unit of work.
impl Tables {
    pub(crate) fn insert_document(&mut self, doc: DocumentRecord) {
        self.documents.push(doc);
    }

    pub(crate) fn document_mut(&mut self, id: DocumentId) -> Result<&mut DocumentRecord> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DocumentNotFound { document_id: id })
    }

    pub(crate) fn insert_line_item(&mut self, line: LineItemRecord) {
        self.line_items.push(line);
    }

    pub(crate) fn insert_stock(&mut self, row: VariantStockRecord) {
        self.stock.insert(row.variant_id, row);
    }

    pub(crate) fn stock_mut(&mut self, id: VariantId) -> Result<&mut VariantStockRecord> {
        self.stock
            .get_mut(&id)
            .ok_or(StoreError::VariantNotFound { variant_id: id })
    }

    pub(crate) fn push_movement(&mut self, entry: MovementEntry) {
        self.movements.push(entry);
    }

    pub(crate) fn push_historic(&mut self, entry: HistoricEntry) {
        self.historic.push(entry);
    }
}

/// In-memory store holding every table behind one `RwLock`.
///
/// Lifecycle operations run inside a [`UnitOfWork`], which takes the write
/// lock for its whole duration: the read-check-write sequence on any stock
/// row is serialized against every other operation, and nothing a unit of
/// work does is visible until it commits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a unit of work, exclusive until committed or dropped.
    pub async fn begin(&self) -> UnitOfWork<'_> {
        let guard = self.tables.write().await;
        UnitOfWork::open(guard)
    }

    /// Opens a read-only view.
    pub async fn read(&self) -> StoreReader<'_> {
        StoreReader {
            guard: self.tables.read().await,
        }
    }

    /// Streams the whole movement ledger in recording order.
    pub async fn stream_movements(&self) -> MovementStream {
        let tables = self.tables.read().await;
        let mut entries = tables.movements().to_vec();
        // Stable sort: entries recorded in the same instant keep append order.
        entries.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Box::pin(stream::iter(entries))
    }

    /// Total number of movement ledger entries.
    pub async fn movement_count(&self) -> usize {
        self.tables.read().await.movements.len()
    }
}

/// Read-only view over the store.
pub struct StoreReader<'a> {
    guard: RwLockReadGuard<'a, Tables>,
}

impl StoreReader<'_> {
    /// The tables under the read lock.
    pub fn tables(&self) -> &Tables {
        &self.guard
    }
}
