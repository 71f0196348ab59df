// src/github/source.rs
// =============================================================================
// The one question the repository list ever asks the network:
// "give me page N of <owner>'s repositories, optionally matching <query>".
//
// It is a trait so the orchestrator can be driven by a fake in tests.
// =============================================================================

use async_trait::async_trait;

use super::client::{ApiResult, GitHubClient, PageRequest, Sort};
use super::models::RepoPage;

#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn fetch_page(&self, owner: &str, query: &str, page: u32, per_page: u32) -> ApiResult<RepoPage>;
}

/// Search qualifier restricting results to one account.
pub fn scoped_query(query: &str, owner: &str) -> String {
    format!("{} user:{}", query.trim(), owner)
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn fetch_page(&self, owner: &str, query: &str, page: u32, per_page: u32) -> ApiResult<RepoPage> {
        // Both branches sort by most recently updated
        let request = PageRequest::new(page, per_page).sorted(Sort::Updated);

        if query.trim().is_empty() {
            let items = self.user_repositories(owner, request).await?;
            let total_count = items.len() as u64;
            Ok(RepoPage { items, total_count })
        } else {
            let response = self.search_repositories(&scoped_query(query, owner), request).await?;
            Ok(RepoPage {
                items: response.items,
                total_count: response.total_count,
            })
        }
    }
}
