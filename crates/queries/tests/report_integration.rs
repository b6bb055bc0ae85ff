//! End-to-end checks of the reporting views over real lifecycle activity.

use common::Money;
use domain::{Catalog, InMemoryDirectory, OrderLifecycle, ReturnLifecycle};
use queries::{AvailabilityQuery, DocumentQueries, StockQueries};
use store::{DocumentKind, MemoryStore, PaymentMethod};

struct Harness {
    store: MemoryStore,
    orders: OrderLifecycle<InMemoryDirectory>,
    returns: ReturnLifecycle<InMemoryDirectory>,
    catalog: Catalog,
    client: common::ClientId,
}

async fn harness() -> Harness {
    let store = MemoryStore::new();
    let directory = InMemoryDirectory::new();
    let client = directory.register("Acme Retail", "buyer@acme.test").await;

    Harness {
        orders: OrderLifecycle::new(store.clone(), directory.clone()),
        returns: ReturnLifecycle::new(store.clone(), directory.clone()),
        catalog: Catalog::new(store.clone()),
        store,
        client: client.id,
    }
}

#[tokio::test]
async fn document_queries_reflect_lifecycle_activity() {
    let h = harness().await;
    let row = h
        .catalog
        .register_variant("SKU-001", Money::from_cents(1000), 10)
        .await
        .unwrap();

    let order = h.orders.create(h.client, Some(PaymentMethod::Cash)).await.unwrap();
    h.orders.add_line_item(order.id, row.variant_id, 4).await.unwrap();
    h.orders.confirm(order.id).await.unwrap();
    h.orders.mark_delivered(order.id).await.unwrap();

    let ret = h.returns.create(h.client, Some(order.id)).await.unwrap();
    h.returns
        .add_line_item(ret.id, row.variant_id, 1, Some("wrong color".into()))
        .await
        .unwrap();

    let documents = DocumentQueries::new(h.store.clone());
    let all = documents.for_client(h.client).await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].document.kind, DocumentKind::Sale);
    assert_eq!(all[1].document.kind, DocumentKind::Return);
    assert_eq!(all[1].document.origin_order_id, Some(order.id));
    assert_eq!(all[1].lines[0].reason.as_deref(), Some("wrong color"));

    let fetched = documents.get(order.id).await.unwrap();
    assert_eq!(fetched.document.total.cents(), 4000);
    assert_eq!(fetched.lines.len(), 1);
}

#[tokio::test]
async fn availability_tracks_deliveries_and_returns() {
    let h = harness().await;
    let row = h
        .catalog
        .register_variant("SKU-001", Money::from_cents(1000), 10)
        .await
        .unwrap();

    let order = h.orders.create(h.client, None).await.unwrap();
    h.orders.add_line_item(order.id, row.variant_id, 6).await.unwrap();
    h.orders.confirm(order.id).await.unwrap();
    h.orders.mark_delivered(order.id).await.unwrap();

    let availability = AvailabilityQuery::new(h.store.clone());
    let before = availability.available(h.client, row.variant_id).await;
    assert_eq!(before.delivered, 6);
    assert_eq!(before.available, 6);

    let ret = h.returns.create(h.client, None).await.unwrap();
    h.returns.add_line_item(ret.id, row.variant_id, 2, None).await.unwrap();

    let after = availability.available(h.client, row.variant_id).await;
    assert_eq!(after.returned, 2);
    assert_eq!(after.available, 4);
}

#[tokio::test]
async fn reconciliation_is_consistent_after_mixed_activity() {
    let h = harness().await;
    let row = h
        .catalog
        .register_variant("SKU-001", Money::from_cents(1000), 10)
        .await
        .unwrap();

    let order = h.orders.create(h.client, None).await.unwrap();
    h.orders.add_line_item(order.id, row.variant_id, 5).await.unwrap();
    h.orders.confirm(order.id).await.unwrap();
    h.orders.mark_delivered(order.id).await.unwrap();

    let ret = h.returns.create(h.client, None).await.unwrap();
    h.returns.add_line_item(ret.id, row.variant_id, 2, None).await.unwrap();
    h.returns.approve_fit(ret.id).await.unwrap();

    h.catalog
        .adjust_stock(row.variant_id, 12, "recount")
        .await
        .unwrap();

    let stock = StockQueries::new(h.store.clone());
    let rec = stock.reconcile(row.variant_id).await.unwrap();
    assert!(rec.consistent);
    assert_eq!(rec.on_hand, 12);
}

#[tokio::test]
async fn sell_through_counts_net_sales_against_inbound_stock() {
    let h = harness().await;
    let row = h
        .catalog
        .register_variant("SKU-001", Money::from_cents(1000), 20)
        .await
        .unwrap();

    // Sell 8, cancel 3 of them in a second order.
    let kept = h.orders.create(h.client, None).await.unwrap();
    h.orders.add_line_item(kept.id, row.variant_id, 5).await.unwrap();
    h.orders.confirm(kept.id).await.unwrap();

    let cancelled = h.orders.create(h.client, None).await.unwrap();
    h.orders.add_line_item(cancelled.id, row.variant_id, 3).await.unwrap();
    h.orders.confirm(cancelled.id).await.unwrap();
    h.orders.cancel(cancelled.id).await.unwrap();

    let stock = StockQueries::new(h.store.clone());
    let report = stock.sell_through().await;
    assert_eq!(report.ever_stocked, 20);
    assert_eq!(report.sold, 5);
    assert_eq!(report.percent_sold, 25.0);
}

#[tokio::test]
async fn scrap_does_not_count_as_inbound_or_sales() {
    let h = harness().await;
    let row = h
        .catalog
        .register_variant("SKU-001", Money::from_cents(1000), 10)
        .await
        .unwrap();

    let order = h.orders.create(h.client, None).await.unwrap();
    h.orders.add_line_item(order.id, row.variant_id, 4).await.unwrap();
    h.orders.confirm(order.id).await.unwrap();
    h.orders.mark_delivered(order.id).await.unwrap();

    let ret = h.returns.create(h.client, None).await.unwrap();
    h.returns
        .add_line_item(ret.id, row.variant_id, 4, Some("damaged".into()))
        .await
        .unwrap();
    h.returns.approve_scrap(ret.id).await.unwrap();

    let stock = StockQueries::new(h.store.clone());
    let report = stock.sell_through().await;
    // Scrapped units stay sold; the write-off entry carries no delta.
    assert_eq!(report.sold, 4);
    assert_eq!(report.ever_stocked, 10);

    let rec = stock.reconcile(row.variant_id).await.unwrap();
    assert!(rec.consistent);
    assert_eq!(rec.on_hand, 6);
}
