// src/store/session.rs
// =============================================================================
// Who is signed in.
//
// States:
//
//   Loading --hydrated(Some(user))--> Authenticated
//   Loading --hydrated(None)-------> Unauthenticated
//   Unauthenticated --login ok / register / set_user--> Authenticated
//   Authenticated --logout--> Unauthenticated
//
// This is a pure state object. It never touches storage itself: every
// operation that should be written through returns a PersistCommand, and the
// caller decides when to run it.
//
// Sign-in is a stub. There is exactly one valid credential pair and no
// backend, no hashing, nothing.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::persist::PersistCommand;

pub const DEMO_EMAIL: &str = "start.mobile.app@gmail.com";
pub const DEMO_PASSWORD: &str = "Admin123!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// The account returned by a successful demo sign-in.
pub fn demo_user() -> User {
    User {
        id: "1".to_string(),
        email: DEMO_EMAIL.to_string(),
        first_name: "Nadir".to_string(),
        last_name: "Musayev".to_string(),
    }
}

/// Fields submitted by the registration form.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: String,
    // Accepted and ignored: there is no backend to hand it to
    #[allow(dead_code)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// A partial edit of the current user. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    // Private so `is_authenticated` can never be true without a user
    user: Option<User>,
    is_authenticated: bool,
    last_operation_success: Option<bool>,
    is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A fresh session, still waiting for hydration.
    pub fn new() -> Self {
        SessionState {
            user: None,
            is_authenticated: false,
            last_operation_success: None,
            is_loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// `Some(true)` / `Some(false)` after an operation, `None` once the
    /// result has been shown and cleared.
    pub fn last_operation_success(&self) -> Option<bool> {
        self.last_operation_success
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// "First Last", or an empty string when nobody is signed in.
    pub fn full_name(&self) -> String {
        self.user.as_ref().map(User::full_name).unwrap_or_default()
    }

    pub fn hydrate_started(&mut self) {
        self.is_loading = true;
    }

    /// Finishes startup with whatever storage produced. A user keeps the
    /// session signed in; `None` leaves it signed out.
    pub fn hydrated(&mut self, stored: Option<User>) {
        self.is_loading = false;
        if let Some(user) = stored {
            debug!(user_id = %user.id, "session restored from storage");
            self.user = Some(user);
            self.is_authenticated = true;
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Option<PersistCommand> {
        if email == DEMO_EMAIL && password == DEMO_PASSWORD {
            let user = demo_user();
            info!(user_id = %user.id, "signed in");
            self.user = Some(user.clone());
            self.is_authenticated = true;
            self.last_operation_success = Some(true);
            Some(PersistCommand::SaveUser(user))
        } else {
            info!("sign-in rejected");
            self.last_operation_success = Some(false);
            None
        }
    }

    /// Creates a session user from the form, unconditionally.
    pub fn register(&mut self, form: RegisterForm) -> PersistCommand {
        self.set_user(User {
            id: "1".to_string(),
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
        })
    }

    pub fn set_user(&mut self, user: User) -> PersistCommand {
        info!(user_id = %user.id, "session user set");
        self.user = Some(user.clone());
        self.is_authenticated = true;
        self.last_operation_success = Some(true);
        PersistCommand::SaveUser(user)
    }

    /// Merges the provided fields into the current user. Does nothing when
    /// nobody is signed in.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Option<PersistCommand> {
        let user = self.user.as_mut()?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        Some(PersistCommand::SaveUser(user.clone()))
    }

    /// Signs out. Safe to call when already signed out.
    pub fn logout(&mut self) -> PersistCommand {
        info!("signed out");
        self.user = None;
        self.is_authenticated = false;
        self.last_operation_success = Some(true);
        PersistCommand::ClearAuth
    }

    pub fn clear_last_operation_result(&mut self) {
        self.last_operation_success = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_out() -> SessionState {
        let mut session = SessionState::new();
        session.hydrated(None);
        session
    }

    #[test]
    fn test_new_session_is_loading_and_signed_out() {
        let session = SessionState::new();
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
        assert_eq!(session.last_operation_success(), None);
    }

    #[test]
    fn test_hydrate_with_user() {
        let mut session = SessionState::new();
        session.hydrated(Some(demo_user()));
        assert!(!session.is_loading());
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&demo_user()));
    }

    #[test]
    fn test_hydrate_without_user() {
        let session = signed_out();
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_login_with_demo_credentials() {
        let mut session = signed_out();
        let command = session.login("start.mobile.app@gmail.com", "Admin123!");

        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&demo_user()));
        assert_eq!(session.last_operation_success(), Some(true));
        assert_eq!(command, Some(PersistCommand::SaveUser(demo_user())));
    }

    #[test]
    fn test_login_with_wrong_credentials() {
        let mut session = signed_out();
        for (email, password) in [
            ("start.mobile.app@gmail.com", "admin123!"),
            ("someone@else.com", "Admin123!"),
            ("", ""),
        ] {
            let command = session.login(email, password);
            assert!(command.is_none());
            assert!(!session.is_authenticated());
            assert!(session.user().is_none());
            assert_eq!(session.last_operation_success(), Some(false));
        }
    }

    #[test]
    fn test_failed_login_keeps_existing_identity() {
        let mut session = signed_out();
        session.login(DEMO_EMAIL, DEMO_PASSWORD);
        session.login(DEMO_EMAIL, "nope");

        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&demo_user()));
        assert_eq!(session.last_operation_success(), Some(false));
    }

    #[test]
    fn test_register_creates_user_from_form() {
        let mut session = signed_out();
        let command = session.register(RegisterForm {
            email: "ada@example.com".into(),
            password: "whatever".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        });

        let user = session.user().cloned().unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.id, "1");
        assert!(session.is_authenticated());
        assert_eq!(session.last_operation_success(), Some(true));
        assert_eq!(command, PersistCommand::SaveUser(user));
    }

    #[test]
    fn test_logout_clears_identity() {
        let mut session = signed_out();
        session.login(DEMO_EMAIL, DEMO_PASSWORD);

        let command = session.logout();
        assert_eq!(command, PersistCommand::ClearAuth);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(session.last_operation_success(), Some(true));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut session = signed_out();
        session.logout();
        let after_first = session.clone();

        session.clear_last_operation_result();
        session.logout();
        assert_eq!(session, after_first);
    }

    #[test]
    fn test_clear_last_operation_result() {
        let mut session = signed_out();
        session.login("bad", "bad");
        session.clear_last_operation_result();
        assert_eq!(session.last_operation_success(), None);
    }

    #[test]
    fn test_update_profile_merges_fields() {
        let mut session = signed_out();
        session.login(DEMO_EMAIL, DEMO_PASSWORD);

        let command = session.update_profile(ProfileUpdate {
            first_name: Some("Nadia".into()),
            ..ProfileUpdate::default()
        });

        let user = session.user().cloned().unwrap();
        assert_eq!(user.first_name, "Nadia");
        assert_eq!(user.last_name, "Musayev");
        assert_eq!(user.email, DEMO_EMAIL);
        assert_eq!(command, Some(PersistCommand::SaveUser(user)));
    }

    #[test]
    fn test_update_profile_without_user_is_noop() {
        let mut session = signed_out();
        let command = session.update_profile(ProfileUpdate {
            email: Some("x@y.z".into()),
            ..ProfileUpdate::default()
        });
        assert!(command.is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_full_name() {
        let mut session = signed_out();
        assert_eq!(session.full_name(), "");

        session.set_user(User {
            id: "1".into(),
            email: "e".into(),
            first_name: "Cher".into(),
            last_name: "".into(),
        });
        assert_eq!(session.full_name(), "Cher");
    }

    #[test]
    fn test_user_json_uses_camel_case() {
        let json = serde_json::to_string(&demo_user()).unwrap();
        assert!(json.contains("\"firstName\":\"Nadir\""));
        assert!(json.contains("\"lastName\":\"Musayev\""));
    }
}
