//! Document and line-item records.
//!
//! A single record shape backs both document kinds; the discriminator plus
//! the kind-specific optional fields replace an inheritance hierarchy. The
//! lifecycle rules live in the `domain` crate — this module only defines the
//! persisted shape.

use chrono::{DateTime, Utc};
use common::{ClientId, DocumentId, LineItemId, Money, VariantId};
use serde::{Deserialize, Serialize};

/// Discriminator between the two document kinds sharing one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A sales order.
    Sale,
    /// A return of previously delivered goods.
    Return,
}

/// The state of a document in its lifecycle.
///
/// Sales orders walk `Draft → Documented → Confirmed → Delivered`, with
/// `Confirmed → Cancelled` as the only other exit. Returns stop at
/// `Confirmed` (with a disposition) and never reach `Delivered` or
/// `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DocumentState {
    /// Freshly created, no line items yet.
    #[default]
    Draft,

    /// Has at least one line item; still editable.
    Documented,

    /// Committed: stock deducted (sale) or disposition recorded (return).
    Confirmed,

    /// Goods handed over; point of no return for cancellation.
    Delivered,

    /// Confirmed sale reverted; stock restored.
    Cancelled,
}

impl DocumentState {
    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Draft => "Draft",
            DocumentState::Documented => "Documented",
            DocumentState::Confirmed => "Confirmed",
            DocumentState::Delivered => "Delivered",
            DocumentState::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a return approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    /// Goods fit for resale; stock was restored.
    Fit,
    /// Goods written off; no stock effect.
    Scrap,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Fit => write!(f, "Fit"),
            Disposition::Scrap => write!(f, "Scrap"),
        }
    }
}

/// How a sales order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Cheque,
    Gateway,
}

impl PaymentMethod {
    /// Parses a payment method name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            "cheque" => Some(PaymentMethod::Cheque),
            "gateway" => Some(PaymentMethod::Gateway),
            _ => None,
        }
    }
}

/// A sales order or a return, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier.
    pub id: DocumentId,

    /// The client the document belongs to.
    pub client_id: ClientId,

    /// Sale or return.
    pub kind: DocumentKind,

    /// Current lifecycle state.
    pub state: DocumentState,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Sum of `quantity × unit_price` over the document's line items.
    pub total: Money,

    /// Sale only.
    pub payment_method: Option<PaymentMethod>,

    /// Return only: the delivered sale this return refers to, if any.
    pub origin_order_id: Option<DocumentId>,

    /// Return only: set exactly once, at approval.
    pub disposition: Option<Disposition>,
}

impl DocumentRecord {
    /// Creates a new sales order in `Draft`.
    pub fn new_sale(client_id: ClientId, payment_method: Option<PaymentMethod>) -> Self {
        Self {
            id: DocumentId::new(),
            client_id,
            kind: DocumentKind::Sale,
            state: DocumentState::Draft,
            created_at: Utc::now(),
            total: Money::zero(),
            payment_method,
            origin_order_id: None,
            disposition: None,
        }
    }

    /// Creates a new return in `Draft`.
    pub fn new_return(client_id: ClientId, origin_order_id: Option<DocumentId>) -> Self {
        Self {
            id: DocumentId::new(),
            client_id,
            kind: DocumentKind::Return,
            state: DocumentState::Draft,
            created_at: Utc::now(),
            total: Money::zero(),
            payment_method: None,
            origin_order_id,
            disposition: None,
        }
    }

    /// Returns true for sales orders.
    pub fn is_sale(&self) -> bool {
        self.kind == DocumentKind::Sale
    }

    /// Returns true for returns.
    pub fn is_return(&self) -> bool {
        self.kind == DocumentKind::Return
    }
}

/// One SKU quantity within a document.
///
/// The unit price is snapshotted when the line is added and never follows
/// later catalog price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Unique line item identifier.
    pub id: LineItemId,

    /// The owning document.
    pub document_id: DocumentId,

    /// The SKU variant this line refers to.
    pub variant_id: VariantId,

    /// Units on this line; always positive.
    pub quantity: u32,

    /// Price per unit, captured at add time.
    pub unit_price: Money,

    /// Return lines only: why the goods came back.
    pub reason: Option<String>,
}

impl LineItemRecord {
    /// Creates a new line item for a document.
    pub fn new(
        document_id: DocumentId,
        variant_id: VariantId,
        quantity: u32,
        unit_price: Money,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            document_id,
            variant_id,
            quantity,
            unit_price,
            reason,
        }
    }

    /// Returns `quantity × unit_price`.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}
