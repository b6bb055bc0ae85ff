//! Return operations.

use common::{ClientId, DocumentId, Money, VariantId};
use store::{
    Disposition, DocumentRecord, DocumentState, LineItemRecord, MemoryStore, MovementEntry,
    MovementKind,
};

use crate::directory::ClientDirectory;

use super::{ReturnError, availability};

/// States in which a return accepts line items.
///
/// `Confirmed` is deliberately included: approved returns stay editable, a
/// behavior carried over from the running system rather than tightened here.
/// Lines added after approval are recorded on the document but have no stock
/// effect of their own.
fn accepts_items(state: DocumentState) -> bool {
    matches!(
        state,
        DocumentState::Draft | DocumentState::Documented | DocumentState::Confirmed
    )
}

/// Service for the return lifecycle.
///
/// Like the order lifecycle, every operation runs in one unit of work and
/// commits all of its effects or none. Approval is the point where stock
/// moves: `Fit` restores the counter, `Scrap` only writes the ledger.
pub struct ReturnLifecycle<D> {
    store: MemoryStore,
    directory: D,
}

impl<D: ClientDirectory> ReturnLifecycle<D> {
    /// Creates the service over a store and a client directory.
    pub fn new(store: MemoryStore, directory: D) -> Self {
        Self { store, directory }
    }

    /// Creates a new return in `Draft` for a known client.
    ///
    /// When `origin_order_id` is given, the referenced document must be a
    /// delivered sales order.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        client_id: ClientId,
        origin_order_id: Option<DocumentId>,
    ) -> Result<DocumentRecord, ReturnError> {
        if self.directory.lookup(client_id).await.is_none() {
            return Err(ReturnError::ClientNotFound { client_id });
        }

        let mut uow = self.store.begin().await;
        if let Some(origin_id) = origin_order_id {
            let origin = uow.document(origin_id)?;
            if !origin.is_sale() {
                return Err(ReturnError::OriginNotASale {
                    document_id: origin_id,
                });
            }
            if origin.state != DocumentState::Delivered {
                return Err(ReturnError::OriginNotDelivered {
                    document_id: origin_id,
                    state: origin.state,
                });
            }
        }

        let doc = DocumentRecord::new_return(client_id, origin_order_id);
        uow.insert_document(doc.clone());
        uow.commit();

        tracing::info!(document_id = %doc.id, "return created");
        Ok(doc)
    }

    /// Adds a line item, enforcing the return ceiling: across all of the
    /// client's return documents, no variant may exceed the quantity ever
    /// delivered to that client.
    #[tracing::instrument(skip(self))]
    pub async fn add_line_item(
        &self,
        return_id: DocumentId,
        variant_id: VariantId,
        quantity: u32,
        reason: Option<String>,
    ) -> Result<DocumentRecord, ReturnError> {
        if quantity == 0 {
            return Err(ReturnError::InvalidQuantity { quantity });
        }

        let mut uow = self.store.begin().await;
        let doc = uow.document(return_id)?;
        if !doc.is_return() {
            return Err(ReturnError::NotAReturn {
                document_id: return_id,
            });
        }
        if !accepts_items(doc.state) {
            return Err(ReturnError::InvalidState {
                state: doc.state,
                action: "add line item",
            });
        }
        let client_id = doc.client_id;

        let row = uow.stock(variant_id)?;
        let sku = row.sku.clone();
        let unit_price = row.unit_price;

        // Ceiling check: lines already on this document plus the new request
        // must fit into what other return documents leave available.
        let avail = availability(uow.tables(), client_id, variant_id, Some(return_id));
        let on_this: u64 = uow
            .tables()
            .line_items_for(return_id)
            .iter()
            .filter(|l| l.variant_id == variant_id)
            .map(|l| l.quantity as u64)
            .sum();

        if on_this + quantity as u64 > avail.available {
            metrics::counter!("over_return_rejections_total").increment(1);
            return Err(ReturnError::OverReturn {
                sku,
                requested: quantity,
                delivered: avail.delivered,
                already_returned: avail.returned + on_this,
                available: avail.available.saturating_sub(on_this),
            });
        }

        uow.insert_line_item(LineItemRecord::new(
            return_id, variant_id, quantity, unit_price, reason,
        ));

        let total: Money = uow
            .tables()
            .line_items_for(return_id)
            .iter()
            .map(|l| l.total_price())
            .sum();
        let doc = uow.document_mut(return_id)?;
        doc.total = total;
        if doc.state == DocumentState::Draft {
            doc.state = DocumentState::Documented;
        }
        let updated = doc.clone();
        uow.commit();
        Ok(updated)
    }

    /// Approves the return as fit for resale: restores stock for every line
    /// and writes one `ReturnRestock` ledger entry per line.
    #[tracing::instrument(skip(self))]
    pub async fn approve_fit(&self, return_id: DocumentId) -> Result<DocumentRecord, ReturnError> {
        self.approve(return_id, Disposition::Fit).await
    }

    /// Approves the return as scrap: writes one `ScrapWriteoff` ledger entry
    /// per line, without restoring stock — scrapped goods are not resellable.
    #[tracing::instrument(skip(self))]
    pub async fn approve_scrap(
        &self,
        return_id: DocumentId,
    ) -> Result<DocumentRecord, ReturnError> {
        self.approve(return_id, Disposition::Scrap).await
    }

    async fn approve(
        &self,
        return_id: DocumentId,
        disposition: Disposition,
    ) -> Result<DocumentRecord, ReturnError> {
        let mut uow = self.store.begin().await;
        let doc = uow.document(return_id)?;
        if !doc.is_return() {
            return Err(ReturnError::NotAReturn {
                document_id: return_id,
            });
        }
        if let Some(existing) = doc.disposition {
            return Err(ReturnError::AlreadyApproved {
                document_id: return_id,
                disposition: existing,
            });
        }

        let lines = uow.tables().line_items_for(return_id);
        if lines.is_empty() {
            return Err(ReturnError::NoLineItems);
        }

        for line in &lines {
            let (kind, delta) = match disposition {
                Disposition::Fit => (MovementKind::ReturnRestock, line.quantity as i64),
                Disposition::Scrap => (MovementKind::ScrapWriteoff, 0),
            };
            if delta != 0 {
                uow.apply_stock_delta(line.variant_id, delta)?;
            }
            uow.record_movement(MovementEntry::new(
                line.variant_id,
                Some(return_id),
                Some(line.id),
                kind,
                line.quantity,
            ));
        }

        let doc = uow.document_mut(return_id)?;
        doc.state = DocumentState::Confirmed;
        doc.disposition = Some(disposition);
        let updated = doc.clone();
        uow.commit();

        let label = match disposition {
            Disposition::Fit => "fit",
            Disposition::Scrap => "scrap",
        };
        metrics::counter!("returns_approved_total", "disposition" => label).increment(1);
        tracing::info!(document_id = %return_id, %disposition, lines = lines.len(), "return approved");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::order::OrderLifecycle;
    use store::{PaymentMethod, VariantStockRecord};

    struct Fixture {
        store: MemoryStore,
        orders: OrderLifecycle<InMemoryDirectory>,
        returns: ReturnLifecycle<InMemoryDirectory>,
        client: ClientId,
        variant: VariantId,
    }

    /// Client with a delivered order of 5 units; stock back at 5 afterwards
    /// via a manual top-up so restocks are easy to observe.
    async fn fixture_with_delivery(delivered: u32) -> Fixture {
        let store = MemoryStore::new();
        let directory = InMemoryDirectory::new();
        let client = directory.register("Acme Retail", "buyer@acme.test").await;

        let row = VariantStockRecord::new("SKU-001", Money::from_cents(1000), delivered);
        let variant = row.variant_id;
        let mut uow = store.begin().await;
        uow.insert_stock(row);
        uow.commit();

        let orders = OrderLifecycle::new(store.clone(), directory.clone());
        let returns = ReturnLifecycle::new(store.clone(), directory.clone());

        let order = orders
            .create(client.id, Some(PaymentMethod::Transfer))
            .await
            .unwrap();
        orders
            .add_line_item(order.id, variant, delivered)
            .await
            .unwrap();
        orders.confirm(order.id).await.unwrap();
        orders.mark_delivered(order.id).await.unwrap();

        Fixture {
            store,
            orders,
            returns,
            client: client.id,
            variant,
        }
    }

    #[tokio::test]
    async fn create_requires_known_client() {
        let fx = fixture_with_delivery(5).await;
        let result = fx.returns.create(ClientId::new(), None).await;
        assert!(matches!(result, Err(ReturnError::ClientNotFound { .. })));
    }

    #[tokio::test]
    async fn create_rejects_undelivered_origin() {
        let fx = fixture_with_delivery(5).await;

        // A confirmed-but-not-delivered order cannot be an origin.
        let other = fx.orders.create(fx.client, None).await.unwrap();
        let result = fx.returns.create(fx.client, Some(other.id)).await;
        assert!(matches!(
            result,
            Err(ReturnError::OriginNotDelivered { .. })
        ));
    }

    #[tokio::test]
    async fn create_rejects_return_as_origin() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();
        let result = fx.returns.create(fx.client, Some(ret.id)).await;
        assert!(matches!(result, Err(ReturnError::OriginNotASale { .. })));
    }

    #[tokio::test]
    async fn add_line_item_within_ceiling() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();

        let ret = fx
            .returns
            .add_line_item(ret.id, fx.variant, 3, Some("wrong size".into()))
            .await
            .unwrap();
        assert_eq!(ret.state, DocumentState::Documented);
        assert_eq!(ret.total.cents(), 3000);
    }

    #[tokio::test]
    async fn over_return_is_rejected_with_figures() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();

        let result = fx.returns.add_line_item(ret.id, fx.variant, 6, None).await;
        match result {
            Err(ReturnError::OverReturn {
                requested,
                delivered,
                already_returned,
                available,
                ..
            }) => {
                assert_eq!(requested, 6);
                assert_eq!(delivered, 5);
                assert_eq!(already_returned, 0);
                assert_eq!(available, 5);
            }
            other => panic!("expected OverReturn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ceiling_counts_lines_already_on_this_return() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();

        fx.returns
            .add_line_item(ret.id, fx.variant, 3, None)
            .await
            .unwrap();
        // 3 already claimed here; 3 more would exceed 5 delivered.
        let result = fx.returns.add_line_item(ret.id, fx.variant, 3, None).await;
        assert!(matches!(result, Err(ReturnError::OverReturn { .. })));

        // 2 more exactly fills the ceiling.
        let ret = fx
            .returns
            .add_line_item(ret.id, fx.variant, 2, None)
            .await
            .unwrap();
        assert_eq!(ret.total.cents(), 5000);
    }

    #[tokio::test]
    async fn approve_fit_restores_stock() {
        let fx = fixture_with_delivery(5).await;
        let on_hand_before = {
            let reader = fx.store.read().await;
            reader.tables().stock(fx.variant).unwrap().on_hand
        };

        let ret = fx.returns.create(fx.client, None).await.unwrap();
        fx.returns
            .add_line_item(ret.id, fx.variant, 5, None)
            .await
            .unwrap();
        let ret = fx.returns.approve_fit(ret.id).await.unwrap();

        assert_eq!(ret.state, DocumentState::Confirmed);
        assert_eq!(ret.disposition, Some(Disposition::Fit));

        let reader = fx.store.read().await;
        assert_eq!(
            reader.tables().stock(fx.variant).unwrap().on_hand,
            on_hand_before + 5
        );
        let restocks: Vec<_> = reader
            .tables()
            .movements_for(fx.variant)
            .into_iter()
            .filter(|m| m.kind == MovementKind::ReturnRestock)
            .collect();
        assert_eq!(restocks.len(), 1);
        assert_eq!(restocks[0].quantity, 5);
    }

    #[tokio::test]
    async fn approve_scrap_writes_ledger_only() {
        let fx = fixture_with_delivery(5).await;
        let on_hand_before = {
            let reader = fx.store.read().await;
            reader.tables().stock(fx.variant).unwrap().on_hand
        };

        let ret = fx.returns.create(fx.client, None).await.unwrap();
        fx.returns
            .add_line_item(ret.id, fx.variant, 3, Some("damaged".into()))
            .await
            .unwrap();
        let ret = fx.returns.approve_scrap(ret.id).await.unwrap();

        assert_eq!(ret.disposition, Some(Disposition::Scrap));

        let reader = fx.store.read().await;
        assert_eq!(
            reader.tables().stock(fx.variant).unwrap().on_hand,
            on_hand_before
        );
        let writeoffs: Vec<_> = reader
            .tables()
            .movements_for(fx.variant)
            .into_iter()
            .filter(|m| m.kind == MovementKind::ScrapWriteoff)
            .collect();
        assert_eq!(writeoffs.len(), 1);
        assert_eq!(writeoffs[0].signed(), 0);
    }

    #[tokio::test]
    async fn approval_is_once_only() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();
        fx.returns
            .add_line_item(ret.id, fx.variant, 2, None)
            .await
            .unwrap();
        fx.returns.approve_fit(ret.id).await.unwrap();

        assert!(matches!(
            fx.returns.approve_fit(ret.id).await,
            Err(ReturnError::AlreadyApproved { .. })
        ));
        assert!(matches!(
            fx.returns.approve_scrap(ret.id).await,
            Err(ReturnError::AlreadyApproved { .. })
        ));
    }

    #[tokio::test]
    async fn approved_return_still_accepts_items() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();
        fx.returns
            .add_line_item(ret.id, fx.variant, 2, None)
            .await
            .unwrap();
        fx.returns.approve_fit(ret.id).await.unwrap();

        // Editable post-approval, within the remaining ceiling.
        let updated = fx
            .returns
            .add_line_item(ret.id, fx.variant, 1, None)
            .await
            .unwrap();
        assert_eq!(updated.total.cents(), 3000);
    }

    #[tokio::test]
    async fn approve_empty_return_fails() {
        let fx = fixture_with_delivery(5).await;
        let ret = fx.returns.create(fx.client, None).await.unwrap();
        assert!(matches!(
            fx.returns.approve_fit(ret.id).await,
            Err(ReturnError::NoLineItems)
        ));
    }

    #[tokio::test]
    async fn sale_documents_reject_return_operations() {
        let fx = fixture_with_delivery(5).await;
        let order = fx.orders.create(fx.client, None).await.unwrap();

        assert!(matches!(
            fx.returns.add_line_item(order.id, fx.variant, 1, None).await,
            Err(ReturnError::NotAReturn { .. })
        ));
        assert!(matches!(
            fx.returns.approve_fit(order.id).await,
            Err(ReturnError::NotAReturn { .. })
        ));
    }
}
