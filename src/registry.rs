//! Explicit client reuse keyed by account identifier.
//!
//! Repeated construction for the same `app_id` can be deduplicated by
//! holding clients in a registry the caller owns and passes around. There
//! is no ambient process-global cache; a bare [`AlipayClient::new`] never
//! consults one.

use std::collections::HashMap;
use std::sync::Arc;

use crate::client::{AlipayClient, ClientConfig};
use crate::error::Error;

/// In-memory registry of clients, keyed by `app_id`.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Arc<AlipayClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Look up an existing client.
    pub fn get(&self, app_id: &str) -> Option<Arc<AlipayClient>> {
        self.clients.get(app_id).cloned()
    }

    /// Return the client registered for `config.app_id`, constructing and
    /// registering it on first use. The configuration is ignored when a
    /// client for that `app_id` already exists.
    pub fn get_or_create(&mut self, config: ClientConfig) -> Result<Arc<AlipayClient>, Error> {
        if let Some(existing) = self.clients.get(&config.app_id) {
            return Ok(existing.clone());
        }

        let client = Arc::new(AlipayClient::new(config)?);
        self.clients
            .insert(client.app_id().to_string(), client.clone());
        Ok(client)
    }

    /// Drop the client registered for `app_id`, if any.
    pub fn remove(&mut self, app_id: &str) -> Option<Arc<AlipayClient>> {
        self.clients.remove(app_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(app_id: &str) -> ClientConfig {
        let keys = crate::sign::test_key_pair();
        ClientConfig {
            app_id: app_id.into(),
            app_private_key: keys.private_key_pem.clone(),
            alipay_public_key: keys.public_key_pem.clone(),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_or_create_reuses_instance() {
        let mut registry = ClientRegistry::new();

        let first = registry.get_or_create(config("app-1")).unwrap();
        let second = registry.get_or_create(config("app-1")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_app_ids_get_distinct_clients() {
        let mut registry = ClientRegistry::new();

        let first = registry.get_or_create(config("app-1")).unwrap();
        let second = registry.get_or_create(config("app-2")).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_construction_error_propagates() {
        let mut registry = ClientRegistry::new();
        assert!(registry.get_or_create(config("")).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut registry = ClientRegistry::new();
        registry.get_or_create(config("app-1")).unwrap();

        assert!(registry.remove("app-1").is_some());
        assert!(registry.get("app-1").is_none());
    }
}
