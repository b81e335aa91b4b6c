// User storage abstraction

use async_trait::async_trait;
use thiserror::Error;

use crate::core::models::User;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryUserStore;
pub use sqlite::SqliteUserStore;

/// Storage operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A user with this name already exists
    #[error("User '{0}' already exists")]
    DuplicateName(String),

    /// Any other storage failure (connectivity, IO, unexpected constraint)
    #[error("Store failure: {0}")]
    Failure(String),
}

/// Persistent storage for users, keyed by unique name
///
/// `create_user` must be an atomic insert-if-absent: two concurrent calls
/// with the same name yield exactly one `Ok` and one `DuplicateName`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with `DuplicateName` if the name is taken
    async fn create_user(&self, name: &str) -> Result<User, StoreError>;

    /// Look up a user by exact name
    async fn find_user(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Number of stored users
    async fn count_users(&self) -> Result<u64, StoreError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
