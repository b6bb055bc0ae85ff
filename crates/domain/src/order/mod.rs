//! Sales order lifecycle.

mod lifecycle;
mod state;

pub use lifecycle::OrderLifecycle;

use common::{ClientId, DocumentId};
use store::{DocumentState, StoreError};
use thiserror::Error;

/// Errors from sales order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The client is not known to the directory.
    #[error("client not found: {client_id}")]
    ClientNotFound { client_id: ClientId },

    /// The document exists but is not a sales order.
    #[error("document {document_id} is not a sales order")]
    NotASale { document_id: DocumentId },

    /// The operation is not legal in the document's current state.
    #[error("invalid state: cannot {action} from {state} state")]
    InvalidState {
        state: DocumentState,
        action: &'static str,
    },

    /// Quantity must be positive.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Confirming an order with no line items.
    #[error("order has no line items")]
    NoLineItems,

    /// A line asked for more than the variant has on hand.
    #[error("insufficient stock for SKU {sku}: requested {requested}, on hand {on_hand}")]
    InsufficientStock {
        sku: String,
        requested: u32,
        on_hand: u32,
    },

    /// Document or variant not found.
    #[error(transparent)]
    Store(#[from] StoreError),
}
