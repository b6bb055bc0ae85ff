//! Client directory collaborator.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ClientId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A known client (the buying business).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
}

/// Lookup seam to the external client registry.
///
/// Registration, profiles, and authentication live outside the engine; the
/// lifecycles only need to resolve an ID before creating a document.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Resolves a client, or `None` if unknown.
    async fn lookup(&self, client_id: ClientId) -> Option<Client>;
}

/// In-memory directory for tests and embedded setups.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    clients: Arc<RwLock<HashMap<ClientId, Client>>>,
}

impl InMemoryDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client and returns it.
    pub async fn register(&self, name: impl Into<String>, email: impl Into<String>) -> Client {
        let client = Client {
            id: ClientId::new(),
            name: name.into(),
            email: email.into(),
        };
        self.clients
            .write()
            .await
            .insert(client.id, client.clone());
        client
    }
}

#[async_trait]
impl ClientDirectory for InMemoryDirectory {
    async fn lookup(&self, client_id: ClientId) -> Option<Client> {
        self.clients.read().await.get(&client_id).cloned()
    }
}
