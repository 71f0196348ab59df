// src/config.rs
// Validated runtime settings, resolved from the global CLI options (which
// themselves fall back to REPO_BROWSER_* environment variables).

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::cli::GlobalOpts;
use crate::theme::SystemScheme;

// GitHub caps per_page at 100
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_base: String,
    pub source_user: String,
    pub per_page: u32,
    pub system_scheme: SystemScheme,
}

impl AppConfig {
    pub fn from_opts(opts: &GlobalOpts) -> Result<Self> {
        if opts.per_page == 0 || opts.per_page > MAX_PER_PAGE {
            bail!("--per-page must be between 1 and {}, got {}", MAX_PER_PAGE, opts.per_page);
        }

        let source_user = opts.source_user.trim();
        if source_user.is_empty() || source_user.contains('/') {
            bail!("--source-user must be a GitHub login, got '{}'", opts.source_user);
        }

        let api_base = Url::parse(&opts.api_base)
            .with_context(|| format!("--api-base is not a valid URL: {}", opts.api_base))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            bail!("--api-base must be an http(s) URL, got {}", opts.api_base);
        }

        Ok(AppConfig {
            data_dir: opts.data_dir.clone(),
            api_base: opts.api_base.trim_end_matches('/').to_string(),
            source_user: source_user.to_string(),
            per_page: opts.per_page,
            system_scheme: opts.system_scheme,
        })
    }
}
