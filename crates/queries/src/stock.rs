//! Stock audit and reporting queries.

use common::VariantId;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use store::{HistoricKind, MemoryStore, MovementEntry, MovementKind, MovementStream, StoreError};

/// Result of checking a variant's counter against its ledgers.
///
/// `expected` is the initial-stock baseline plus the signed sum of every
/// movement entry; a well-behaved history makes it equal `on_hand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub variant_id: VariantId,
    pub on_hand: u32,
    pub expected: i64,
    pub consistent: bool,
}

/// Share of ever-stocked units that went out as sales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellThrough {
    /// Net inbound units across all variants (initial stock plus manual
    /// adjustments), from the historic-stock ledger.
    pub ever_stocked: i64,

    /// Units sold and kept: sale deductions minus cancel reversals.
    pub sold: i64,

    /// `sold / ever_stocked`, as a percentage rounded to two decimals.
    pub percent_sold: f64,
}

/// Read-only stock audit queries.
#[derive(Clone)]
pub struct StockQueries {
    store: MemoryStore,
}

impl StockQueries {
    /// Creates the query service over a store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// The full movement audit trail of one variant, oldest first.
    pub async fn movement_history(&self, variant_id: VariantId) -> Vec<MovementEntry> {
        let reader = self.store.read().await;
        reader.tables().movements_for(variant_id)
    }

    /// Streams one variant's movements out of the whole ledger.
    pub async fn movement_stream(&self, variant_id: VariantId) -> MovementStream {
        let stream = self.store.stream_movements().await;
        Box::pin(stream.filter(move |m| {
            let matches = m.variant_id == variant_id;
            async move { matches }
        }))
    }

    /// Checks one variant's live counter against its ledgers.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self, variant_id: VariantId) -> Result<Reconciliation, StoreError> {
        let reader = self.store.read().await;
        let tables = reader.tables();
        let on_hand = tables.stock(variant_id)?.on_hand;

        let baseline: i64 = tables
            .historic_for(variant_id)
            .iter()
            .filter(|e| e.kind == HistoricKind::Initial)
            .map(|e| e.delta)
            .sum();
        let moved: i64 = tables
            .movements_for(variant_id)
            .iter()
            .map(|m| m.signed())
            .sum();

        let expected = baseline + moved;
        let consistent = expected == on_hand as i64;
        if !consistent {
            tracing::warn!(
                %variant_id,
                on_hand,
                expected,
                "stock counter disagrees with ledgers"
            );
        }

        Ok(Reconciliation {
            variant_id,
            on_hand,
            expected,
            consistent,
        })
    }

    /// Percentage of ever-stocked units sold, across all variants.
    #[tracing::instrument(skip(self))]
    pub async fn sell_through(&self) -> SellThrough {
        let reader = self.store.read().await;
        let tables = reader.tables();

        let ever_stocked: i64 = tables.historic().iter().map(|e| e.delta).sum();
        let sold: i64 = tables
            .movements()
            .iter()
            .map(|m| match m.kind {
                MovementKind::SaleDeduction => m.quantity as i64,
                MovementKind::CancelReversal => -(m.quantity as i64),
                _ => 0,
            })
            .sum();

        let percent_sold = if ever_stocked > 0 {
            let raw = sold as f64 * 100.0 / ever_stocked as f64;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        SellThrough {
            ever_stocked,
            sold,
            percent_sold,
        }
    }
}
