// src/store/repositories.rs
// =============================================================================
// The paginated repository list: what has been fetched so far, for which
// query, and whether a fetch is in progress.
//
// A fetch is split in two so the store itself never waits on the network:
//
//   let ticket = store.begin_fetch(params);        // flags on, error cleared
//   let result = source.fetch_page(...).await;     // caller does the I/O
//   store.complete_fetch(ticket, result);          // fold the page in
//
// Page 1 (or a refresh) replaces the list. Any later page is appended after
// what is already there, in fetch order. Items are never deduplicated.
//
// Stale results: every ticket carries the generation it was issued under.
// Starting another fetch, changing the query or clearing the list moves the
// generation forward, and completions carrying an older generation are
// discarded. Two quick "load more" requests for the same page therefore
// append once, and a slow response for an old query can't land in the new
// query's list.
// =============================================================================

use tracing::{debug, warn};

use crate::github::{ApiError, RepoPage, Repository, DEFAULT_PER_PAGE};

const FETCH_FALLBACK: &str = "Failed to fetch repositories";

/// What to fetch next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    /// 1-based page number.
    pub page: u32,
    pub query: String,
    pub refresh: bool,
}

impl FetchParams {
    pub fn first_page(query: &str) -> Self {
        FetchParams {
            page: 1,
            query: query.to_string(),
            refresh: false,
        }
    }

    pub fn refresh(query: &str) -> Self {
        FetchParams {
            page: 1,
            query: query.to_string(),
            refresh: true,
        }
    }
}

/// Proof that a fetch was started. Hand it back to `complete_fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    params: FetchParams,
}

impl FetchTicket {
    pub fn params(&self) -> &FetchParams {
        &self.params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was folded into the list.
    Applied,
    /// The fetch failed; the list is untouched and `error()` says why.
    Failed,
    /// A newer fetch or a query change made this result irrelevant.
    Stale,
}

#[derive(Debug, Clone)]
pub struct RepositoryStore {
    items: Vec<Repository>,
    current: Option<Repository>,
    is_loading: bool,
    is_refreshing: bool,
    error: Option<String>,
    search_query: String,
    page: u32,
    has_more: bool,
    total_count: u64,
    per_page: u32,
    generation: u64,
    // Generation of the most recently started fetch, while it is outstanding
    pending: Option<u64>,
}

impl Default for RepositoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl RepositoryStore {
    pub fn new(per_page: u32) -> Self {
        RepositoryStore {
            items: Vec::new(),
            current: None,
            is_loading: false,
            is_refreshing: false,
            error: None,
            search_query: String::new(),
            page: 1,
            has_more: true,
            total_count: 0,
            per_page,
            generation: 0,
            pending: None,
        }
    }

    pub fn items(&self) -> &[Repository] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Replaces the query and rewinds paging. Does not fetch and does not
    /// clear the list; call `clear_list` and start a fetch when ready.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.page = 1;
        self.has_more = true;
        self.invalidate_in_flight();
    }

    /// Empties the list so a new query doesn't show stale items.
    pub fn clear_list(&mut self) {
        self.items.clear();
        self.page = 1;
        self.has_more = true;
        self.total_count = 0;
        self.invalidate_in_flight();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Remembers the item a detail view is showing. Independent of the list.
    pub fn set_current_item(&mut self, item: Repository) {
        self.current = Some(item);
    }

    pub fn current_item(&self) -> Option<&Repository> {
        self.current.as_ref()
    }

    pub fn clear_current_item(&mut self) {
        self.current = None;
    }

    /// Parameters for "load more", or `None` when a fetch is already running
    /// or the last page has been reached.
    pub fn next_page(&self) -> Option<FetchParams> {
        if self.is_loading || self.is_refreshing || !self.has_more {
            return None;
        }
        Some(FetchParams {
            page: self.page + 1,
            query: self.search_query.clone(),
            refresh: false,
        })
    }

    pub fn begin_fetch(&mut self, params: FetchParams) -> FetchTicket {
        if params.refresh {
            self.is_refreshing = true;
        } else {
            self.is_loading = true;
        }
        self.error = None;
        self.generation += 1;
        self.pending = Some(self.generation);

        debug!(
            generation = self.generation,
            page = params.page,
            query = %params.query,
            refresh = params.refresh,
            "repository fetch started"
        );

        FetchTicket {
            generation: self.generation,
            params,
        }
    }

    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<RepoPage, ApiError>) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale repository fetch"
            );
            // Nothing newer is running, so nobody else will turn the flags off
            if self.pending == Some(ticket.generation) {
                self.finish_loading();
            }
            return FetchOutcome::Stale;
        }

        self.finish_loading();

        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let params = ticket.params;
                if params.refresh || params.page == 1 {
                    self.items = page.items;
                } else {
                    self.items.extend(page.items);
                }
                self.page = params.page;
                self.total_count = page.total_count;
                self.has_more = fetched >= self.per_page as usize;
                self.error = None;

                debug!(
                    page = self.page,
                    fetched,
                    total = self.items.len(),
                    has_more = self.has_more,
                    "repository page applied"
                );
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, page = ticket.params.page, "repository fetch failed");
                self.error = Some(if message.trim().is_empty() {
                    FETCH_FALLBACK.to_string()
                } else {
                    message
                });
                FetchOutcome::Failed
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.is_refreshing = false;
        self.pending = None;
    }

    fn invalidate_in_flight(&mut self) {
        self.generation += 1;
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a generation?
//    - A counter that goes up every time the list's "current question" changes
//    - begin_fetch stamps the ticket with the counter's value at that moment
//    - complete_fetch compares the stamp with the counter now; a mismatch means
//      someone asked something newer in the meantime, so the page is dropped
//
// 2. Why take the ticket by value?
//    - complete_fetch(ticket, ...) consumes it, so the same fetch can't be
//      completed twice by accident
//
// 3. Why is `pending` separate from `generation`?
//    - set_search_query bumps the generation without starting a fetch
//    - The fetch that was running is now stale, but nobody else will clear
//      is_loading, so the stale completion still has to do it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Owner;

    fn repo(id: u64) -> Repository {
        Repository {
            id,
            name: format!("repo-{}", id),
            full_name: format!("facebook/repo-{}", id),
            description: None,
            html_url: format!("https://github.com/facebook/repo-{}", id),
            stargazers_count: id * 10,
            forks_count: id,
            language: Some("Rust".to_string()),
            created_at: "2020-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            owner: Owner {
                login: "facebook".to_string(),
                avatar_url: "https://example.com/a.png".to_string(),
            },
        }
    }

    // Repositories with ids start..start+count
    fn page_of(start: u64, count: u64) -> RepoPage {
        RepoPage {
            items: (start..start + count).map(repo).collect(),
            total_count: 100,
        }
    }

    fn ids(store: &RepositoryStore) -> Vec<u64> {
        store.items().iter().map(|r| r.id).collect()
    }

    fn fetch(store: &mut RepositoryStore, params: FetchParams, result: Result<RepoPage, ApiError>) -> FetchOutcome {
        let ticket = store.begin_fetch(params);
        store.complete_fetch(ticket, result)
    }

    fn page(n: u32) -> FetchParams {
        FetchParams {
            page: n,
            query: String::new(),
            refresh: false,
        }
    }

    #[test]
    fn test_initial_state() {
        let store = RepositoryStore::default();
        assert!(store.items().is_empty());
        assert_eq!(store.page(), 1);
        assert!(store.has_more());
        assert_eq!(store.per_page(), 20);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_begin_fetch_sets_loading_or_refreshing() {
        let mut store = RepositoryStore::default();
        store.begin_fetch(page(1));
        assert!(store.is_loading());
        assert!(!store.is_refreshing());

        let mut store = RepositoryStore::default();
        store.begin_fetch(FetchParams::refresh(""));
        assert!(store.is_refreshing());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_begin_fetch_clears_previous_error() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Err(ApiError::Transport("offline".into())));
        assert!(store.error().is_some());

        store.begin_fetch(page(1));
        assert!(store.error().is_none());
    }

    #[test]
    fn test_refresh_replaces_regardless_of_contents() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        fetch(&mut store, page(2), Ok(page_of(21, 20)));
        assert_eq!(store.items().len(), 40);

        let outcome = fetch(&mut store, FetchParams::refresh(""), Ok(page_of(500, 3)));
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(ids(&store), vec![500, 501, 502]);
        assert!(!store.is_refreshing());
    }

    #[test]
    fn test_refresh_of_later_page_still_replaces() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        let params = FetchParams {
            page: 2,
            query: String::new(),
            refresh: true,
        };
        fetch(&mut store, params, Ok(page_of(50, 2)));
        assert_eq!(ids(&store), vec![50, 51]);
    }

    #[test]
    fn test_later_pages_append_in_order() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        fetch(&mut store, page(2), Ok(page_of(21, 20)));
        fetch(&mut store, page(3), Ok(page_of(41, 2)));

        let expected: Vec<u64> = (1..=42).collect();
        assert_eq!(ids(&store), expected);
        assert_eq!(store.page(), 3);
    }

    #[test]
    fn test_duplicates_across_pages_are_kept() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        fetch(&mut store, page(2), Ok(page_of(20, 20)));
        assert_eq!(store.items().len(), 40);
        assert_eq!(store.items().iter().filter(|r| r.id == 20).count(), 2);
    }

    #[test]
    fn test_has_more_tracks_short_pages() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        assert!(store.has_more());

        fetch(&mut store, page(1), Ok(page_of(1, 19)));
        assert!(!store.has_more());

        fetch(&mut store, page(1), Ok(page_of(1, 0)));
        assert!(!store.has_more());
    }

    #[test]
    fn test_has_more_uses_configured_page_size() {
        let mut store = RepositoryStore::new(5);
        fetch(&mut store, page(1), Ok(page_of(1, 5)));
        assert!(store.has_more());
        fetch(&mut store, page(2), Ok(page_of(6, 4)));
        assert!(!store.has_more());
    }

    #[test]
    fn test_twenty_then_five_items() {
        let mut store = RepositoryStore::default();
        store.set_search_query("react");
        store.clear_list();

        fetch(&mut store, FetchParams::first_page("react"), Ok(page_of(1, 20)));
        assert!(store.has_more());

        let next = store.next_page().unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(next.query, "react");
        fetch(&mut store, next, Ok(page_of(21, 5)));

        assert!(!store.has_more());
        assert_eq!(store.items().len(), 25);
        assert!(store.next_page().is_none());
    }

    #[test]
    fn test_set_search_query_resets_paging() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));
        fetch(&mut store, page(2), Ok(page_of(21, 3)));
        assert_eq!(store.page(), 2);
        assert!(!store.has_more());

        store.set_search_query("x");
        assert_eq!(store.search_query(), "x");
        assert_eq!(store.page(), 1);
        assert!(store.has_more());
        // The list itself is the caller's to clear
        assert_eq!(store.items().len(), 23);
    }

    #[test]
    fn test_clear_list() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 7)));

        store.clear_list();
        assert!(store.items().is_empty());
        assert_eq!(store.page(), 1);
        assert!(store.has_more());
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn test_failure_leaves_list_untouched() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));

        let outcome = fetch(
            &mut store,
            page(2),
            Err(ApiError::Http {
                status: 403,
                message: "API rate limit exceeded".into(),
            }),
        );

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.items().len(), 20);
        assert_eq!(store.page(), 1);
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("GitHub API error 403: API rate limit exceeded"));
    }

    #[test]
    fn test_failure_with_empty_message_uses_fallback() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Err(ApiError::Transport(String::new())));
        assert_eq!(store.error(), Some("Failed to fetch repositories"));
    }

    #[test]
    fn test_error_persists_until_cleared() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Err(ApiError::Transport("offline".into())));
        store.set_search_query("y");
        assert_eq!(store.error(), Some("offline"));

        store.clear_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn test_success_updates_total_count() {
        let mut store = RepositoryStore::default();
        fetch(
            &mut store,
            page(1),
            Ok(RepoPage {
                items: vec![repo(1)],
                total_count: 321,
            }),
        );
        assert_eq!(store.total_count(), 321);
    }

    #[test]
    fn test_double_load_more_appends_once() {
        let mut store = RepositoryStore::default();
        fetch(&mut store, page(1), Ok(page_of(1, 20)));

        let first = store.begin_fetch(page(2));
        let second = store.begin_fetch(page(2));

        assert_eq!(store.complete_fetch(first, Ok(page_of(21, 20))), FetchOutcome::Stale);
        // The newer request is still outstanding
        assert!(store.is_loading());

        assert_eq!(store.complete_fetch(second, Ok(page_of(21, 20))), FetchOutcome::Applied);
        assert_eq!(store.items().len(), 40);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_old_query_result_is_discarded() {
        let mut store = RepositoryStore::default();
        let old = store.begin_fetch(FetchParams::first_page("old"));

        store.set_search_query("new");
        store.clear_list();
        let new = store.begin_fetch(FetchParams::first_page("new"));

        assert_eq!(store.complete_fetch(new, Ok(page_of(100, 2))), FetchOutcome::Applied);
        assert_eq!(store.complete_fetch(old, Ok(page_of(1, 20))), FetchOutcome::Stale);
        assert_eq!(ids(&store), vec![100, 101]);
    }

    #[test]
    fn test_stale_completion_of_latest_fetch_clears_flags() {
        let mut store = RepositoryStore::default();
        let ticket = store.begin_fetch(page(1));
        store.clear_list();

        assert_eq!(store.complete_fetch(ticket, Ok(page_of(1, 20))), FetchOutcome::Stale);
        assert!(!store.is_loading());
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_next_page_blocked_while_loading() {
        let mut store = RepositoryStore::default();
        store.begin_fetch(page(1));
        assert!(store.next_page().is_none());
    }

    #[test]
    fn test_current_item_is_independent_of_list() {
        let mut store = RepositoryStore::default();
        store.set_current_item(repo(9));
        fetch(&mut store, FetchParams::refresh(""), Ok(page_of(1, 3)));
        store.clear_list();

        assert_eq!(store.current_item().map(|r| r.id), Some(9));
        store.clear_current_item();
        assert!(store.current_item().is_none());
    }
}
