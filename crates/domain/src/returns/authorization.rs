//! Return authorization calculator.
//!
//! Pure computation over the document tables, used both to block
//! over-returning when a line is added and to answer the read-only "how much
//! can this client still return" query.

use common::{ClientId, DocumentId, VariantId};
use serde::{Deserialize, Serialize};
use store::{DocumentKind, DocumentState, Tables};

/// How much of one variant a client may still return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnAvailability {
    /// Units of this variant ever delivered to the client.
    pub delivered: u64,

    /// Units already claimed on return documents (approved or not).
    pub returned: u64,

    /// `max(0, delivered - returned)`.
    pub available: u64,
}

/// Computes return availability for one client and variant.
///
/// `delivered` sums line items of the client's *delivered* sales;
/// `returned` sums line items of all the client's returns, excluding
/// `exclude` (the document currently being edited, so its own lines can be
/// tallied separately by the caller).
///
/// This scans the client's full document history on every call — a
/// deliberate trade-off while per-client volume stays small.
pub fn availability(
    tables: &Tables,
    client_id: ClientId,
    variant_id: VariantId,
    exclude: Option<DocumentId>,
) -> ReturnAvailability {
    let mut delivered: u64 = 0;
    let mut returned: u64 = 0;

    for doc in tables.documents_for_client(client_id) {
        let counted: u64 = tables
            .line_items_for(doc.id)
            .iter()
            .filter(|l| l.variant_id == variant_id)
            .map(|l| l.quantity as u64)
            .sum();

        match doc.kind {
            DocumentKind::Sale if doc.state == DocumentState::Delivered => delivered += counted,
            DocumentKind::Return if Some(doc.id) != exclude => returned += counted,
            _ => {}
        }
    }

    ReturnAvailability {
        delivered,
        returned,
        available: delivered.saturating_sub(returned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use store::{DocumentRecord, LineItemRecord, MemoryStore};

    async fn seed(
        store: &MemoryStore,
        client: ClientId,
        variant: VariantId,
        kind: DocumentKind,
        state: DocumentState,
        quantity: u32,
    ) -> DocumentId {
        let mut doc = match kind {
            DocumentKind::Sale => DocumentRecord::new_sale(client, None),
            DocumentKind::Return => DocumentRecord::new_return(client, None),
        };
        doc.state = state;
        let doc_id = doc.id;

        let mut uow = store.begin().await;
        uow.insert_document(doc);
        uow.insert_line_item(LineItemRecord::new(
            doc_id,
            variant,
            quantity,
            Money::from_cents(1000),
            None,
        ));
        uow.commit();
        doc_id
    }

    #[tokio::test]
    async fn only_delivered_sales_count_as_delivered() {
        let store = MemoryStore::new();
        let client = ClientId::new();
        let variant = VariantId::new();

        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Delivered, 5).await;
        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Confirmed, 7).await;

        let reader = store.read().await;
        let avail = availability(reader.tables(), client, variant, None);
        assert_eq!(avail.delivered, 5);
        assert_eq!(avail.returned, 0);
        assert_eq!(avail.available, 5);
    }

    #[tokio::test]
    async fn all_returns_count_regardless_of_state() {
        let store = MemoryStore::new();
        let client = ClientId::new();
        let variant = VariantId::new();

        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Delivered, 10).await;
        // One approved, one still a draft: both claim units.
        seed(&store, client, variant, DocumentKind::Return, DocumentState::Confirmed, 3).await;
        seed(&store, client, variant, DocumentKind::Return, DocumentState::Draft, 2).await;

        let reader = store.read().await;
        let avail = availability(reader.tables(), client, variant, None);
        assert_eq!(avail.delivered, 10);
        assert_eq!(avail.returned, 5);
        assert_eq!(avail.available, 5);
    }

    #[tokio::test]
    async fn excluded_document_is_not_tallied() {
        let store = MemoryStore::new();
        let client = ClientId::new();
        let variant = VariantId::new();

        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Delivered, 10).await;
        let editing =
            seed(&store, client, variant, DocumentKind::Return, DocumentState::Documented, 4).await;

        let reader = store.read().await;
        let avail = availability(reader.tables(), client, variant, Some(editing));
        assert_eq!(avail.returned, 0);
        assert_eq!(avail.available, 10);
    }

    #[tokio::test]
    async fn available_floors_at_zero() {
        let store = MemoryStore::new();
        let client = ClientId::new();
        let variant = VariantId::new();

        // Over-returned data can predate the ceiling check; the calculator
        // must not underflow.
        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Delivered, 2).await;
        seed(&store, client, variant, DocumentKind::Return, DocumentState::Confirmed, 5).await;

        let reader = store.read().await;
        let avail = availability(reader.tables(), client, variant, None);
        assert_eq!(avail.available, 0);
    }

    #[tokio::test]
    async fn other_clients_and_variants_are_ignored() {
        let store = MemoryStore::new();
        let client = ClientId::new();
        let variant = VariantId::new();

        seed(&store, client, variant, DocumentKind::Sale, DocumentState::Delivered, 5).await;
        seed(&store, ClientId::new(), variant, DocumentKind::Sale, DocumentState::Delivered, 9).await;
        seed(&store, client, VariantId::new(), DocumentKind::Sale, DocumentState::Delivered, 9).await;

        let reader = store.read().await;
        let avail = availability(reader.tables(), client, variant, None);
        assert_eq!(avail.delivered, 5);
    }
}
