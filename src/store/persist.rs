// src/store/persist.rs
// =============================================================================
// Storage writes requested by state transitions.
//
// The stores only *describe* what should be written; `apply()` performs it.
// That keeps the state machines free of I/O and lets tests inspect exactly
// which writes a transition asked for.
// =============================================================================

use tracing::debug;

use super::session::User;
use crate::storage::{AuthStorage, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistCommand {
    /// Store the user and mark the session as authenticated.
    SaveUser(User),
    /// Forget the stored user and the authenticated flag.
    ClearAuth,
}

/// Executes one command. Storage failures are logged by the store and never
/// reach the caller.
pub async fn apply(store: &dyn KeyValueStore, command: PersistCommand) {
    debug!(?command, "persisting");
    match command {
        PersistCommand::SaveUser(user) => AuthStorage::save_user(store, &user).await,
        PersistCommand::ClearAuth => AuthStorage::clear_auth(store).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::store::session::demo_user;

    #[tokio::test]
    async fn test_save_then_clear() {
        let store = MemoryStore::default();

        apply(&store, PersistCommand::SaveUser(demo_user())).await;
        assert!(AuthStorage::is_authenticated(&store).await);
        assert_eq!(AuthStorage::load_user(&store).await, Some(demo_user()));

        apply(&store, PersistCommand::ClearAuth).await;
        assert!(store.snapshot().is_empty());
    }
}
