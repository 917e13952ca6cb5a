use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::cache::{CacheResult, TokenStore, models::token::CachedToken};

/// Process-local token store for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<HashMap<String, CachedToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().expect("poisoned lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &str, entry: CachedToken) -> CacheResult<()> {
        self.tokens
            .lock()
            .expect("poisoned lock")
            .insert(token.to_string(), entry);
        Ok(())
    }

    async fn find(&self, token: &str) -> CacheResult<Option<CachedToken>> {
        Ok(self.tokens.lock().expect("poisoned lock").get(token).cloned())
    }

    async fn remove(&self, token: &str) -> CacheResult<()> {
        self.tokens.lock().expect("poisoned lock").remove(token);
        Ok(())
    }

    async fn purge_all(&self) -> CacheResult<u64> {
        let mut tokens = self.tokens.lock().expect("poisoned lock");
        let removed = tokens.len() as u64;
        tokens.clear();
        Ok(removed)
    }
}
