// src/storage/mod.rs
// =============================================================================
// Local device storage: where the session flag, the signed-in user, the theme
// and the language live between runs.
//
// Submodules:
// - kv: the raw string key-value store (file-backed) and its error policy
// - prefs: typed helpers for each stored setting
// =============================================================================

mod kv;
mod prefs;

pub use kv::{FileStore, KeyValueStore};
pub use prefs::{AuthStorage, LanguageStorage, ThemeStorage};

#[cfg(test)]
pub use kv::MemoryStore;
