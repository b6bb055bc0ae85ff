//! Variant registration and manual stock adjustment.
//!
//! These are the only writers of the historic-stock ledger: it tracks
//! inbound provisioning (what was ever put on the shelf), independent of the
//! sales-driven movement ledger. Catalog *metadata* (names, colors, sizes)
//! lives outside the engine.

use common::{Money, VariantId};
use store::{
    HistoricEntry, HistoricKind, MemoryStore, MovementEntry, MovementKind, StoreError,
    VariantStockRecord,
};
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// SKU codes are unique across variants.
    #[error("SKU already registered: {sku}")]
    DuplicateSku { sku: String },

    /// Prices must be positive.
    #[error("invalid price: {cents} cents (must be greater than 0)")]
    InvalidPrice { cents: i64 },

    /// Variant not found.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service for stock provisioning.
pub struct Catalog {
    store: MemoryStore,
}

impl Catalog {
    /// Creates the service over a store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Registers a new variant with its price and initial stock.
    ///
    /// A non-zero initial stock opens the variant's historic ledger with an
    /// `Initial` entry. Registration never writes the movement ledger.
    #[tracing::instrument(skip(self))]
    pub async fn register_variant(
        &self,
        sku: &str,
        unit_price: Money,
        initial_stock: u32,
    ) -> Result<VariantStockRecord, CatalogError> {
        if !unit_price.is_positive() {
            return Err(CatalogError::InvalidPrice {
                cents: unit_price.cents(),
            });
        }

        let mut uow = self.store.begin().await;
        if uow.tables().stock_by_sku(sku).is_some() {
            return Err(CatalogError::DuplicateSku { sku: sku.into() });
        }

        let row = VariantStockRecord::new(sku, unit_price, initial_stock);
        if initial_stock > 0 {
            uow.record_historic(HistoricEntry::new(
                row.variant_id,
                HistoricKind::Initial,
                initial_stock as i64,
                initial_stock,
                "initial stock",
            ));
        }
        uow.insert_stock(row.clone());
        uow.commit();

        tracing::info!(variant_id = %row.variant_id, sku, initial_stock, "variant registered");
        Ok(row)
    }

    /// Sets a variant's on-hand count to `new_on_hand`, recording the delta
    /// in both ledgers.
    ///
    /// The historic cumulative continues from the variant's latest historic
    /// entry and floors at zero on downward adjustment.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        variant_id: VariantId,
        new_on_hand: u32,
        reason: &str,
    ) -> Result<VariantStockRecord, CatalogError> {
        let mut uow = self.store.begin().await;
        let row = uow.stock(variant_id)?;
        let delta = new_on_hand as i64 - row.on_hand as i64;
        if delta == 0 {
            return Ok(row.clone());
        }

        let base = uow.tables().last_cumulative(variant_id).unwrap_or(0) as i64;
        let (movement_kind, historic_kind) = if delta > 0 {
            (MovementKind::AdjustUp, HistoricKind::AdjustUp)
        } else {
            (MovementKind::AdjustDown, HistoricKind::AdjustDown)
        };

        uow.apply_stock_delta(variant_id, delta)?;
        uow.record_movement(MovementEntry::new(
            variant_id,
            None,
            None,
            movement_kind,
            delta.unsigned_abs() as u32,
        ));
        uow.record_historic(HistoricEntry::new(
            variant_id,
            historic_kind,
            delta,
            (base + delta).max(0) as u32,
            reason,
        ));

        let updated = uow.stock(variant_id)?.clone();
        uow.commit();

        tracing::info!(variant_id = %variant_id, delta, new_on_hand, "stock adjusted");
        Ok(updated)
    }

    /// Updates a variant's catalog price. Ledgers are untouched; existing
    /// line items keep their snapshots.
    #[tracing::instrument(skip(self))]
    pub async fn update_price(
        &self,
        variant_id: VariantId,
        unit_price: Money,
    ) -> Result<VariantStockRecord, CatalogError> {
        if !unit_price.is_positive() {
            return Err(CatalogError::InvalidPrice {
                cents: unit_price.cents(),
            });
        }

        let mut uow = self.store.begin().await;
        uow.set_unit_price(variant_id, unit_price)?;
        let updated = uow.stock(variant_id)?.clone();
        uow.commit();
        Ok(updated)
    }
}
