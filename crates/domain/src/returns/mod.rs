//! Return lifecycle and authorization.

mod authorization;
mod lifecycle;

pub use authorization::{ReturnAvailability, availability};
pub use lifecycle::ReturnLifecycle;

use common::{ClientId, DocumentId};
use store::{Disposition, DocumentState, StoreError};
use thiserror::Error;

/// Errors from return operations.
#[derive(Debug, Error)]
pub enum ReturnError {
    /// The client is not known to the directory.
    #[error("client not found: {client_id}")]
    ClientNotFound { client_id: ClientId },

    /// The document exists but is not a return.
    #[error("document {document_id} is not a return")]
    NotAReturn { document_id: DocumentId },

    /// The referenced origin document is not a sales order.
    #[error("origin document {document_id} is not a sales order")]
    OriginNotASale { document_id: DocumentId },

    /// Returns can only reference delivered orders.
    #[error("origin order {document_id} is not delivered (state: {state})")]
    OriginNotDelivered {
        document_id: DocumentId,
        state: DocumentState,
    },

    /// The operation is not legal in the document's current state.
    #[error("invalid state: cannot {action} from {state} state")]
    InvalidState {
        state: DocumentState,
        action: &'static str,
    },

    /// Quantity must be positive.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Approving a return with no line items.
    #[error("return has no line items")]
    NoLineItems,

    /// A return can only be approved once.
    #[error("return {document_id} was already approved as {disposition}")]
    AlreadyApproved {
        document_id: DocumentId,
        disposition: Disposition,
    },

    /// The request would push total returns past total deliveries for this
    /// client and variant.
    #[error(
        "over-return for SKU {sku}: requested {requested}, delivered {delivered}, \
         already returned {already_returned}, available {available}"
    )]
    OverReturn {
        sku: String,
        requested: u32,
        delivered: u64,
        already_returned: u64,
        available: u64,
    },

    /// Document or variant not found.
    #[error(transparent)]
    Store(#[from] StoreError),
}
