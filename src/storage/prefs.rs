// src/storage/prefs.rs
// =============================================================================
// Typed helpers on top of the raw key-value store.
//
// Key space:
//   @is_authenticated  -> the literal string "true" while signed in
//   @user              -> the signed-in user, serialized as JSON
//   @theme_mode        -> "light" | "dark" | "system"
//   language           -> "en" | "ru"
//
// Like the store itself, none of these report failures: a value that can't be
// read or parsed is logged and treated as absent.
// =============================================================================

use tracing::warn;

use super::kv::KeyValueStore;
use crate::i18n::Locale;
use crate::store::User;
use crate::theme::ThemeMode;

pub const KEY_IS_AUTHENTICATED: &str = "@is_authenticated";
pub const KEY_USER: &str = "@user";
pub const KEY_THEME_MODE: &str = "@theme_mode";
pub const KEY_LANGUAGE: &str = "language";

pub struct AuthStorage;

impl AuthStorage {
    /// Writes the user and raises the authenticated flag.
    pub async fn save_user(store: &dyn KeyValueStore, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => {
                store.set(KEY_USER, &json).await;
                store.set(KEY_IS_AUTHENTICATED, "true").await;
            }
            Err(e) => warn!(error = %e, "failed to serialize user"),
        }
    }

    pub async fn is_authenticated(store: &dyn KeyValueStore) -> bool {
        store.get(KEY_IS_AUTHENTICATED).await.as_deref() == Some("true")
    }

    pub async fn load_user(store: &dyn KeyValueStore) -> Option<User> {
        let json = store.get(KEY_USER).await?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "stored user is not valid JSON");
                None
            }
        }
    }

    pub async fn clear_auth(store: &dyn KeyValueStore) {
        store.remove(KEY_IS_AUTHENTICATED).await;
        store.remove(KEY_USER).await;
    }
}

pub struct ThemeStorage;

impl ThemeStorage {
    pub async fn save(store: &dyn KeyValueStore, mode: ThemeMode) {
        store.set(KEY_THEME_MODE, mode.as_str()).await;
    }

    /// Missing or unrecognized values read as `ThemeMode::System`.
    pub async fn load(store: &dyn KeyValueStore) -> ThemeMode {
        match store.get(KEY_THEME_MODE).await {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "unrecognized stored theme mode");
                ThemeMode::System
            }),
            None => ThemeMode::System,
        }
    }
}

pub struct LanguageStorage;

impl LanguageStorage {
    pub async fn save(store: &dyn KeyValueStore, locale: Locale) {
        store.set(KEY_LANGUAGE, locale.as_str()).await;
    }

    pub async fn load(store: &dyn KeyValueStore) -> Option<Locale> {
        let raw = store.get(KEY_LANGUAGE).await?;
        raw.parse().ok()
    }
}
