//! Read-only return availability.

use common::{ClientId, VariantId};
use domain::{ReturnAvailability, availability};
use store::MemoryStore;

/// Answers "how much of this variant can this client still return" without
/// touching any document.
#[derive(Clone)]
pub struct AvailabilityQuery {
    store: MemoryStore,
}

impl AvailabilityQuery {
    /// Creates the query service over a store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Delivered, already-returned, and remaining quantities for one client
    /// and variant.
    pub async fn available(
        &self,
        client_id: ClientId,
        variant_id: VariantId,
    ) -> ReturnAvailability {
        let reader = self.store.read().await;
        availability(reader.tables(), client_id, variant_id, None)
    }
}
