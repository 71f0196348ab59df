// src/theme.rs
// =============================================================================
// The user's theme preference.
//
// "system" means "follow whatever the platform says". A terminal has no
// reliable way to report that, so the platform scheme is passed in from
// configuration (REPO_BROWSER_SYSTEM_SCHEME) and defaults to light.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    System,
}

/// What the platform itself is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SystemScheme {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    pub fn is_dark(self, system: SystemScheme) -> bool {
        match self {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => system == SystemScheme::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_follows_platform() {
        assert!(ThemeMode::System.is_dark(SystemScheme::Dark));
        assert!(!ThemeMode::System.is_dark(SystemScheme::Light));
    }

    #[test]
    fn test_explicit_modes_ignore_platform() {
        assert!(ThemeMode::Dark.is_dark(SystemScheme::Light));
        assert!(!ThemeMode::Light.is_dark(SystemScheme::Dark));
    }

    #[test]
    fn test_parse_and_display_agree() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System] {
            assert_eq!(mode.to_string().parse::<ThemeMode>(), Ok(mode));
        }
        assert!("Dark".parse::<ThemeMode>().is_err());
    }
}
