// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Submodules:
// - client: the HTTP adapter (one reqwest client, uniform error mapping)
// - endpoints: relative paths of the endpoints we use
// - models: serde types for the JSON we get back
// - source: the paginated "list or search one account" seam used by the stores
// =============================================================================

mod client;
mod endpoints;
mod models;
mod source;

pub use client::{ApiError, Envelope, GitHubClient, PageRequest, DEFAULT_API_BASE, DEFAULT_PER_PAGE};
pub use models::{Commit, Contents, Issue, PullRequest, RepoPage, Repository};
pub use source::RepoSource;

#[cfg(test)]
pub use client::ApiResult;
#[cfg(test)]
pub use models::Owner;
