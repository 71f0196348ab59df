// src/store/mod.rs
// =============================================================================
// Application state.
//
// Submodules:
// - session: the signed-in user and the sign-in/sign-out lifecycle
// - repositories: the paginated, searchable repository list
// - persist: storage writes that state transitions ask for
//
// Neither store does I/O. The orchestrator in app.rs owns one of each, feeds
// them the results of network and storage calls, and runs the persistence
// commands they return.
// =============================================================================

mod persist;
mod repositories;
mod session;

pub use persist::{apply, PersistCommand};
pub use repositories::{FetchOutcome, FetchParams, RepositoryStore};
pub use session::{ProfileUpdate, RegisterForm, SessionState, User};

#[cfg(test)]
pub use session::{demo_user, DEMO_EMAIL, DEMO_PASSWORD};
