//! Document read queries.

use common::{ClientId, DocumentId};
use serde::{Deserialize, Serialize};
use store::{DocumentRecord, LineItemRecord, MemoryStore, Tables};

/// A document together with its line items, as callers usually want it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentWithLines {
    pub document: DocumentRecord,
    pub lines: Vec<LineItemRecord>,
}

/// Read-only document lookups.
#[derive(Clone)]
pub struct DocumentQueries {
    store: MemoryStore,
}

impl DocumentQueries {
    /// Creates the query service over a store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// One document with its lines, or `None` if unknown.
    pub async fn get(&self, document_id: DocumentId) -> Option<DocumentWithLines> {
        let reader = self.store.read().await;
        let tables = reader.tables();
        let document = tables.document(document_id).ok()?.clone();
        Some(with_lines(tables, document))
    }

    /// All of one client's documents, oldest first.
    pub async fn for_client(&self, client_id: ClientId) -> Vec<DocumentWithLines> {
        let reader = self.store.read().await;
        let tables = reader.tables();
        tables
            .documents_for_client(client_id)
            .into_iter()
            .map(|d| with_lines(tables, d))
            .collect()
    }

    /// Every document in the store, oldest first.
    pub async fn all(&self) -> Vec<DocumentWithLines> {
        let reader = self.store.read().await;
        let tables = reader.tables();
        tables
            .all_documents()
            .into_iter()
            .map(|d| with_lines(tables, d))
            .collect()
    }
}

fn with_lines(tables: &Tables, document: DocumentRecord) -> DocumentWithLines {
    let lines = tables.line_items_for(document.id);
    DocumentWithLines { document, lines }
}
