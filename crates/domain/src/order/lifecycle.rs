//! Sales order operations.

use common::{ClientId, DocumentId, Money, VariantId};
use store::{
    DocumentRecord, DocumentState, LineItemRecord, MemoryStore, MovementEntry, MovementKind,
    PaymentMethod, UnitOfWork,
};

use crate::directory::ClientDirectory;

use super::{OrderError, state};

/// Service for the sales order lifecycle.
///
/// Every operation runs in one unit of work: it reads the document and the
/// affected stock rows, validates, and either commits all of its mutations
/// (stock counters, ledger appends, document state) or none of them.
///
/// The payment gateway drives two of these operations from the outside:
/// payment approval calls [`confirm`](Self::confirm), rejection calls
/// [`cancel`](Self::cancel).
pub struct OrderLifecycle<D> {
    store: MemoryStore,
    directory: D,
}

impl<D: ClientDirectory> OrderLifecycle<D> {
    /// Creates the service over a store and a client directory.
    pub fn new(store: MemoryStore, directory: D) -> Self {
        Self { store, directory }
    }

    /// Creates a new sales order in `Draft` for a known client.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        client_id: ClientId,
        payment_method: Option<PaymentMethod>,
    ) -> Result<DocumentRecord, OrderError> {
        if self.directory.lookup(client_id).await.is_none() {
            return Err(OrderError::ClientNotFound { client_id });
        }

        let doc = DocumentRecord::new_sale(client_id, payment_method);
        let mut uow = self.store.begin().await;
        uow.insert_document(doc.clone());
        uow.commit();

        tracing::info!(document_id = %doc.id, "sales order created");
        Ok(doc)
    }

    /// Adds a line item, snapshotting the variant's current price.
    ///
    /// Legal in `Draft` and `Documented`; the first item moves a draft to
    /// `Documented`. The document total is recomputed from all lines.
    #[tracing::instrument(skip(self))]
    pub async fn add_line_item(
        &self,
        document_id: DocumentId,
        variant_id: VariantId,
        quantity: u32,
    ) -> Result<DocumentRecord, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        let mut uow = self.store.begin().await;
        let doc = uow.document(document_id)?;
        if !doc.is_sale() {
            return Err(OrderError::NotASale { document_id });
        }
        if !state::can_modify_items(doc.state) {
            return Err(OrderError::InvalidState {
                state: doc.state,
                action: "add line item",
            });
        }

        let unit_price = uow.stock(variant_id)?.unit_price;
        uow.insert_line_item(LineItemRecord::new(
            document_id,
            variant_id,
            quantity,
            unit_price,
            None,
        ));

        let updated = refresh_document(&mut uow, document_id)?;
        uow.commit();
        Ok(updated)
    }

    /// Commits the sale: deducts stock for every line and writes one
    /// `SaleDeduction` ledger entry per line.
    ///
    /// Legal from `Documented`, or `Draft` when line items already exist.
    /// Any shortfall aborts the whole operation before anything is visible.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, document_id: DocumentId) -> Result<DocumentRecord, OrderError> {
        let mut uow = self.store.begin().await;
        let doc = uow.document(document_id)?;
        if !doc.is_sale() {
            return Err(OrderError::NotASale { document_id });
        }
        if !state::can_confirm(doc.state) {
            return Err(OrderError::InvalidState {
                state: doc.state,
                action: "confirm",
            });
        }

        let lines = uow.tables().line_items_for(document_id);
        if lines.is_empty() {
            return Err(OrderError::NoLineItems);
        }

        for line in &lines {
            let row = uow.stock(line.variant_id)?;
            // Earlier lines of this confirm are already staged, so two lines
            // on the same variant must jointly fit.
            if row.on_hand < line.quantity {
                metrics::counter!("stock_rejections_total").increment(1);
                return Err(OrderError::InsufficientStock {
                    sku: row.sku.clone(),
                    requested: line.quantity,
                    on_hand: row.on_hand,
                });
            }
            uow.apply_stock_delta(line.variant_id, -(line.quantity as i64))?;
            uow.record_movement(MovementEntry::new(
                line.variant_id,
                Some(document_id),
                Some(line.id),
                MovementKind::SaleDeduction,
                line.quantity,
            ));
        }

        let doc = uow.document_mut(document_id)?;
        doc.state = DocumentState::Confirmed;
        let updated = doc.clone();
        uow.commit();

        metrics::counter!("orders_confirmed_total").increment(1);
        tracing::info!(document_id = %document_id, lines = lines.len(), "order confirmed");
        Ok(updated)
    }

    /// Reverts a confirmed sale: restores stock for every line and writes
    /// one `CancelReversal` ledger entry per line.
    ///
    /// Delivered orders cannot be cancelled; disputes over delivered goods
    /// go through the return lifecycle.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, document_id: DocumentId) -> Result<DocumentRecord, OrderError> {
        let mut uow = self.store.begin().await;
        let doc = uow.document(document_id)?;
        if !doc.is_sale() {
            return Err(OrderError::NotASale { document_id });
        }
        if !state::can_cancel(doc.state) {
            return Err(OrderError::InvalidState {
                state: doc.state,
                action: "cancel",
            });
        }

        for line in uow.tables().line_items_for(document_id) {
            uow.apply_stock_delta(line.variant_id, line.quantity as i64)?;
            uow.record_movement(MovementEntry::new(
                line.variant_id,
                Some(document_id),
                Some(line.id),
                MovementKind::CancelReversal,
                line.quantity,
            ));
        }

        let doc = uow.document_mut(document_id)?;
        doc.state = DocumentState::Cancelled;
        let updated = doc.clone();
        uow.commit();

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(document_id = %document_id, "order cancelled, stock restored");
        Ok(updated)
    }

    /// Marks a confirmed order delivered. No stock effect — the deduction
    /// happened at confirm time.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(
        &self,
        document_id: DocumentId,
    ) -> Result<DocumentRecord, OrderError> {
        let mut uow = self.store.begin().await;
        let doc = uow.document(document_id)?;
        if !doc.is_sale() {
            return Err(OrderError::NotASale { document_id });
        }
        if !state::can_deliver(doc.state) {
            return Err(OrderError::InvalidState {
                state: doc.state,
                action: "mark delivered",
            });
        }

        let doc = uow.document_mut(document_id)?;
        doc.state = DocumentState::Delivered;
        let updated = doc.clone();
        uow.commit();

        tracing::info!(document_id = %document_id, "order delivered");
        Ok(updated)
    }
}

/// Recomputes the total from all lines and applies the first-item
/// `Draft → Documented` transition.
fn refresh_document(
    uow: &mut UnitOfWork<'_>,
    document_id: DocumentId,
) -> Result<DocumentRecord, OrderError> {
    let total: Money = uow
        .tables()
        .line_items_for(document_id)
        .iter()
        .map(|l| l.total_price())
        .sum();

    let doc = uow.document_mut(document_id)?;
    doc.total = total;
    if doc.state == DocumentState::Draft {
        doc.state = DocumentState::Documented;
    }
    Ok(doc.clone())
}
