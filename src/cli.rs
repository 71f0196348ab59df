// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Each subcommand is one "screen" of the browser: sign in, register, the
// profile, the repository list, a repository's detail page, and the two
// settings toggles. The global options configure where state is kept and
// which GitHub account is browsed; every one of them can also come from an
// environment variable (clap's `env` feature).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::i18n::Locale;
use crate::theme::{SystemScheme, ThemeMode};

#[derive(Parser, Debug)]
#[command(
    name = "repo-browser",
    version,
    about = "Browse and search one GitHub account's repositories",
    long_about = "repo-browser lists and searches the public repositories of a single GitHub account, \
                  page by page. Signing in uses a built-in demo account; the session, theme and \
                  language are remembered between runs."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Directory where the session and preferences are stored
    #[arg(long, global = true, env = "REPO_BROWSER_DATA_DIR", default_value = ".repo-browser")]
    pub data_dir: PathBuf,

    /// GitHub REST API base URL
    #[arg(long, global = true, env = "REPO_BROWSER_API_BASE", default_value = crate::github::DEFAULT_API_BASE)]
    pub api_base: String,

    /// The account whose repositories are listed and searched
    #[arg(long, global = true, env = "REPO_BROWSER_SOURCE_USER", default_value = "facebook")]
    pub source_user: String,

    /// Repositories requested per page (1-100)
    #[arg(long, global = true, env = "REPO_BROWSER_PER_PAGE", default_value_t = 20)]
    pub per_page: u32,

    /// Log level for repo-browser's own messages (RUST_LOG overrides it)
    #[arg(long, global = true, env = "REPO_BROWSER_LOG", default_value = "warn")]
    pub log_level: String,

    /// The platform color scheme used when the theme is "system"
    #[arg(long, global = true, env = "REPO_BROWSER_SYSTEM_SCHEME", value_enum, default_value_t = SystemScheme::Light)]
    pub system_scheme: SystemScheme,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password
    ///
    /// Example: repo-browser login start.mobile.app@gmail.com 'Admin123!'
    Login { email: String, password: String },

    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Sign out (does nothing harmful when already signed out)
    Logout,

    /// Show who is signed in
    Whoami,

    /// Change the signed-in user's profile fields
    Profile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },

    /// List the account's repositories, most recently updated first
    ///
    /// Example: repo-browser list --query react --pages 2
    List {
        /// Only show repositories matching this search
        #[arg(long, short)]
        query: Option<String>,

        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Load the first page as a pull-to-refresh would
        #[arg(long)]
        refresh: bool,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one repository in detail
    ///
    /// Example: repo-browser show facebook/react --commits --pulls
    Show {
        /// Repository as owner/name
        repo: String,

        /// Also list recent commits
        #[arg(long)]
        commits: bool,

        /// Also list open issues
        #[arg(long)]
        issues: bool,

        /// Also list open pull requests
        #[arg(long)]
        pulls: bool,

        /// Also list files (optionally under a path)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        contents: Option<String>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Show or change the interface language
    Language {
        #[arg(value_enum)]
        locale: Option<Locale>,
    },
}
