// src/github/models.rs
// =============================================================================
// Data types returned by the GitHub REST API.
//
// Only the fields the browser actually shows are declared. serde ignores
// unknown fields by default, so the rest of GitHub's (large) payloads are
// simply skipped during decoding.
// =============================================================================

use serde::{Deserialize, Serialize};

/// The account that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// One repository record, as returned by the listing, search and detail endpoints.
///
/// Immutable once fetched. Refreshing a list replaces these wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub owner: Owner,
}

/// Body of `/search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Repository>,
}

/// One fetched page of repositories, normalized across the listing and
/// search endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPage {
    pub items: Vec<Repository>,
    pub total_count: u64,
}

// Sub-resources of a repository. These are only rendered by the detail view.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub login: String,
}

/// An issue. GitHub also returns pull requests from the issues endpoint;
/// those carry a `pull_request` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<UserRef>,
    pub html_url: String,
}

/// One entry of a directory listing from the contents endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
}

/// The contents endpoint returns a JSON array for directories and a single
/// object for files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}
