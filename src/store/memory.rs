// In-memory user store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::{StoreError, UserStore};
use crate::core::models::User;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, User>,
    next_id: i64,
}

/// Mutex-guarded user map for tests and ephemeral runs
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;

        if inner.users.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            name: name.to_string(),
        };
        inner.users.insert(name.to_string(), user.clone());

        debug!(user_id = user.id, "Inserted user into memory store");
        Ok(user)
    }

    async fn find_user(&self, name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(name).cloned())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
