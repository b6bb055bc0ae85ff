use common::{DocumentId, VariantId};
use thiserror::Error;

/// Errors surfaced by the store itself.
///
/// Business-rule violations (insufficient stock at confirm time, over-return)
/// are reported by the lifecycle services before these guards can trigger;
/// `StockUnderflow` is the store's own last line against a negative counter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced document does not exist.
    #[error("document not found: {document_id}")]
    DocumentNotFound { document_id: DocumentId },

    /// Referenced variant does not exist.
    #[error("variant not found: {variant_id}")]
    VariantNotFound { variant_id: VariantId },

    /// A stock delta would drive the on-hand count negative.
    #[error("stock underflow for SKU {sku}: on hand {on_hand}, requested {requested}")]
    StockUnderflow {
        sku: String,
        on_hand: u32,
        requested: u32,
    },
}

/// Convenience alias for store results.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
