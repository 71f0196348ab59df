// src/app.rs
// =============================================================================
// The orchestrator: one object, built once in main(), that owns both stores
// and the two I/O adapters they depend on.
//
// Every operation follows the same two steps:
// 1. run the pure state transition on the store
// 2. carry out whatever I/O the transition asked for (a storage write, or a
//    network fetch whose result is handed back to the store)
//
// All mutation happens through &mut self, so the stores are only ever
// changed from one place at a time. The only suspension points are the
// awaits on storage and network calls.
// =============================================================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::github::RepoSource;
use crate::i18n::Locale;
use crate::storage::{AuthStorage, KeyValueStore, LanguageStorage, ThemeStorage};
use crate::store::{
    self, FetchOutcome, FetchParams, PersistCommand, ProfileUpdate, RegisterForm, RepositoryStore, SessionState,
};
use crate::theme::ThemeMode;

pub struct App {
    storage: Arc<dyn KeyValueStore>,
    source: Arc<dyn RepoSource>,
    // The one account whose repositories are listed and searched
    owner: String,
    session: SessionState,
    repositories: RepositoryStore,
}

impl App {
    pub fn new(storage: Arc<dyn KeyValueStore>, source: Arc<dyn RepoSource>, owner: &str, per_page: u32) -> Self {
        App {
            storage,
            source,
            owner: owner.to_string(),
            session: SessionState::new(),
            repositories: RepositoryStore::new(per_page),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn repositories(&self) -> &RepositoryStore {
        &self.repositories
    }

    pub fn repositories_mut(&mut self) -> &mut RepositoryStore {
        &mut self.repositories
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    async fn persist(&self, command: Option<PersistCommand>) {
        if let Some(command) = command {
            store::apply(self.storage.as_ref(), command).await;
        }
    }

    // ---- session -----------------------------------------------------------

    /// Restores the session from storage. Call once at startup.
    pub async fn hydrate(&mut self) {
        self.session.hydrate_started();
        let user = if AuthStorage::is_authenticated(self.storage.as_ref()).await {
            AuthStorage::load_user(self.storage.as_ref()).await
        } else {
            None
        };
        self.session.hydrated(user);
        debug!(
            authenticated = self.session.is_authenticated(),
            loading = self.session.is_loading(),
            "session hydrated"
        );
    }

    /// Returns whether the credentials were accepted.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let command = self.session.login(email, password);
        self.persist(command).await;
        self.session.last_operation_success() == Some(true)
    }

    pub async fn register(&mut self, form: RegisterForm) {
        let command = self.session.register(form);
        self.persist(Some(command)).await;
    }

    pub async fn logout(&mut self) {
        let command = self.session.logout();
        self.persist(Some(command)).await;
    }

    /// Returns false when nobody is signed in.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> bool {
        let command = self.session.update_profile(update);
        let updated = command.is_some();
        self.persist(command).await;
        updated
    }

    /// Call after showing the success/failure notice for an operation.
    pub fn clear_last_operation_result(&mut self) {
        self.session.clear_last_operation_result();
    }

    // ---- repository list ---------------------------------------------------

    pub async fn fetch_repositories(&mut self, params: FetchParams) -> FetchOutcome {
        let ticket = self.repositories.begin_fetch(params);
        let request = ticket.params().clone();
        debug!(
            loading = self.repositories.is_loading(),
            refreshing = self.repositories.is_refreshing(),
            "waiting for repository page"
        );
        let result = self
            .source
            .fetch_page(&self.owner, &request.query, request.page, self.repositories.per_page())
            .await;
        let outcome = self.repositories.complete_fetch(ticket, result);
        info!(page = request.page, query = %request.query, ?outcome, "repository fetch finished");
        outcome
    }

    /// Switches to a new query: rewinds paging, drops the old list and
    /// fetches the first page.
    pub async fn search(&mut self, query: &str) -> FetchOutcome {
        self.repositories.set_search_query(query);
        self.repositories.clear_list();
        self.fetch_repositories(FetchParams::first_page(query)).await
    }

    /// Fetches page 1 of the current query again, replacing the list.
    pub async fn refresh(&mut self) -> FetchOutcome {
        let query = self.repositories.search_query().to_string();
        self.fetch_repositories(FetchParams::refresh(&query)).await
    }

    /// Appends the next page. `None` when there is nothing more to load.
    pub async fn load_more(&mut self) -> Option<FetchOutcome> {
        let params = self.repositories.next_page()?;
        Some(self.fetch_repositories(params).await)
    }

    /// Loads the first page for `query`, then keeps appending pages until
    /// `pages` are loaded, the list runs out, or a fetch fails. Asking for
    /// zero pages still loads the first one.
    ///
    /// With `refresh`, the first page is fetched as a refresh of `query`.
    /// Otherwise an empty query browses the account and any other query
    /// starts a new search. Returns how many pages made it into the list.
    pub async fn load_pages(&mut self, query: &str, pages: u32, refresh: bool) -> u32 {
        let first = if refresh {
            self.repositories.set_search_query(query);
            self.refresh().await
        } else if query.trim().is_empty() {
            self.fetch_repositories(FetchParams::first_page("")).await
        } else {
            self.search(query).await
        };
        if first != FetchOutcome::Applied {
            return 0;
        }

        let mut loaded = 1;
        while loaded < pages {
            match self.load_more().await {
                Some(FetchOutcome::Applied) => loaded += 1,
                Some(_) | None => break,
            }
        }
        loaded
    }

    // ---- preferences -------------------------------------------------------

    pub async fn theme(&self) -> ThemeMode {
        ThemeStorage::load(self.storage.as_ref()).await
    }

    pub async fn set_theme(&self, mode: ThemeMode) {
        ThemeStorage::save(self.storage.as_ref(), mode).await;
    }

    pub async fn stored_language(&self) -> Option<Locale> {
        LanguageStorage::load(self.storage.as_ref()).await
    }

    pub async fn set_language(&self, locale: Locale) {
        LanguageStorage::save(self.storage.as_ref(), locale).await;
    }
}
