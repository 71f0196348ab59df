// src/main.rs
// =============================================================================
// This is the entry point of the repository browser.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Build the one App (stores + storage + GitHub client) and restore the
//    saved session
// 3. Dispatch to the subcommand handler, which plays the part of a screen
// 4. Exit with proper code (0 = success, 1 = operation failed, 2 = error)
//
// Screens that show GitHub data (list, show) are only reachable while signed
// in, just like the app's main router sits behind the auth router.
// =============================================================================

mod app;
mod cli;
mod config;
mod github;
mod i18n;
mod logging;
mod storage;
mod store;
mod theme;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

use app::App;
use cli::{Cli, Commands};
use config::AppConfig;
use github::{Commit, Contents, Envelope, GitHubClient, Issue, PageRequest, PullRequest, Repository};
use i18n::{t, Locale, Message};
use storage::{FileStore, KeyValueStore};
use store::{ProfileUpdate, RegisterForm};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(&cli.global.log_level);

    let config = AppConfig::from_opts(&cli.global)?;
    tracing::debug!(?config, "configuration resolved");

    let file_store = FileStore::new(&config.data_dir);
    tracing::debug!(path = %file_store.path().display(), "using storage file");
    let storage: Arc<dyn KeyValueStore> = Arc::new(file_store);
    let client = Arc::new(GitHubClient::new(&config.api_base).context("failed to create the GitHub client")?);

    let mut app = App::new(storage, client.clone(), &config.source_user, config.per_page);
    app.hydrate().await;

    let lang_env = std::env::var("LANG").ok();
    let locale = Locale::detect(app.stored_language().await, lang_env.as_deref());

    match cli.command {
        Commands::Login { email, password } => {
            app.login(&email, &password).await;
            Ok(report_last_operation(&mut app, locale, Message::LoginSuccess, Message::LoginFailed))
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let form = RegisterForm {
                email,
                password,
                first_name,
                last_name,
            };
            app.register(form).await;
            Ok(report_last_operation(&mut app, locale, Message::RegisterSuccess, Message::RegisterSuccess))
        }
        Commands::Logout => {
            app.logout().await;
            Ok(report_last_operation(&mut app, locale, Message::LogoutSuccess, Message::LogoutSuccess))
        }
        Commands::Whoami => Ok(print_whoami(&app, locale)),
        Commands::Profile {
            email,
            first_name,
            last_name,
        } => {
            let update = ProfileUpdate {
                email,
                first_name,
                last_name,
            };
            handle_profile(&mut app, locale, update).await
        }
        Commands::List {
            query,
            pages,
            refresh,
            json,
        } => {
            if !app.session().is_authenticated() {
                return Ok(not_signed_in(locale));
            }
            handle_list(&mut app, locale, query.unwrap_or_default(), pages, refresh, json).await
        }
        Commands::Show {
            repo,
            commits,
            issues,
            pulls,
            contents,
            json,
        } => {
            if !app.session().is_authenticated() {
                return Ok(not_signed_in(locale));
            }
            let wanted = DetailSections {
                commits,
                issues,
                pulls,
                contents,
            };
            handle_show(&mut app, &client, &config, locale, &repo, wanted, json).await
        }
        Commands::Theme { mode } => {
            match mode {
                Some(mode) => {
                    app.set_theme(mode).await;
                    println!("✅ {}: {}", t(locale, Message::ThemeSaved), mode);
                }
                None => {
                    let mode = app.theme().await;
                    let effective = if mode.is_dark(config.system_scheme) { "dark" } else { "light" };
                    println!("{}: {} ({})", t(locale, Message::ThemeCurrent), mode, effective);
                }
            }
            Ok(0)
        }
        Commands::Language { locale: chosen } => {
            match chosen {
                Some(chosen) => {
                    app.set_language(chosen).await;
                    // Confirm in the language just picked
                    println!("✅ {}: {}", t(chosen, Message::LanguageSaved), chosen);
                }
                None => println!("{}: {}", t(locale, Message::LanguageCurrent), locale),
            }
            Ok(0)
        }
    }
}

// Shows the one-shot result of a session operation, then clears it so it
// would not be shown twice.
fn report_last_operation(app: &mut App, locale: Locale, success: Message, failure: Message) -> i32 {
    let code = match app.session().last_operation_success() {
        Some(true) => {
            println!("✅ {}", t(locale, success));
            0
        }
        Some(false) => {
            println!("❌ {}", t(locale, failure));
            1
        }
        None => 0,
    };
    app.clear_last_operation_result();
    code
}

fn not_signed_in(locale: Locale) -> i32 {
    println!("🔒 {}", t(locale, Message::NotSignedIn));
    1
}

fn print_whoami(app: &App, locale: Locale) -> i32 {
    match app.session().user() {
        Some(user) => {
            println!("👤 {} {} <{}>", t(locale, Message::SignedInAs), app.session().full_name(), user.email);
            0
        }
        None => not_signed_in(locale),
    }
}

async fn handle_profile(app: &mut App, locale: Locale, update: ProfileUpdate) -> Result<i32> {
    if update.is_empty() {
        return Ok(print_whoami(app, locale));
    }
    if !app.update_profile(update).await {
        return Ok(not_signed_in(locale));
    }
    println!("✅ {}", t(locale, Message::ProfileUpdated));
    Ok(print_whoami(app, locale))
}

// ---- list screen ------------------------------------------------------------

#[derive(Serialize)]
struct ListPayload<'a> {
    owner: &'a str,
    query: &'a str,
    page: u32,
    has_more: bool,
    total_count: u64,
    items: &'a [Repository],
}

async fn handle_list(app: &mut App, locale: Locale, query: String, pages: u32, refresh: bool, json: bool) -> Result<i32> {
    let loaded = app.load_pages(&query, pages, refresh).await;
    tracing::debug!(loaded, requested = pages, "list pages loaded");

    let repositories = app.repositories();
    let error = repositories.error().map(str::to_string);

    if json {
        let envelope = Envelope {
            result: error.is_none(),
            data: Some(ListPayload {
                owner: app.owner(),
                query: repositories.search_query(),
                page: repositories.page(),
                has_more: repositories.has_more(),
                total_count: repositories.total_count(),
                items: repositories.items(),
            }),
            message: error.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_repository_table(repositories.items(), locale);
        if !repositories.items().is_empty() {
            println!();
            println!(
                "📊 {}: {} / {}",
                t(locale, Message::Total),
                repositories.items().len(),
                repositories.total_count()
            );
            if repositories.has_more() {
                println!("⬇️  {}", t(locale, Message::MoreAvailable));
            } else {
                println!("🏁 {}", t(locale, Message::EndOfList));
            }
        }
        if let Some(message) = &error {
            eprintln!("❌ {}: {}", t(locale, Message::FetchFailed), message);
        }
    }

    // Shown once; the exit code still reflects it
    app.repositories_mut().clear_error();
    Ok(if error.is_some() { 1 } else { 0 })
}

fn print_repository_table(items: &[Repository], locale: Locale) {
    if items.is_empty() {
        println!("📭 {}", t(locale, Message::NoRepositories));
        return;
    }

    println!(
        "{:<40} {:>8} {:>8} {:<14} {:<20}",
        t(locale, Message::Name).to_uppercase(),
        t(locale, Message::Stars).to_uppercase(),
        t(locale, Message::Forks).to_uppercase(),
        t(locale, Message::Language).to_uppercase(),
        t(locale, Message::Updated).to_uppercase()
    );
    println!("{}", "=".repeat(94));

    for repo in items {
        println!(
            "{:<40} {:>8} {:>8} {:<14} {:<20}",
            truncate(&repo.full_name, 40),
            repo.stargazers_count,
            repo.forks_count,
            repo.language.as_deref().unwrap_or("-"),
            // "2024-01-31T12:00:00Z" -> "2024-01-31"
            repo.updated_at.get(..10).unwrap_or(&repo.updated_at)
        );
    }
}

// Cuts on a char boundary so non-ASCII names don't panic
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

// ---- detail screen ----------------------------------------------------------

struct DetailSections {
    commits: bool,
    issues: bool,
    pulls: bool,
    contents: Option<String>,
}

#[derive(Serialize)]
struct DetailPayload<'a> {
    repository: &'a Repository,
    #[serde(skip_serializing_if = "Option::is_none")]
    commits: Option<Envelope<Vec<Commit>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Envelope<Vec<Issue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pulls: Option<Envelope<Vec<PullRequest>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<Envelope<Contents>>,
}

fn parse_repo_arg(repo: &str) -> Result<(&str, &str)> {
    match repo.trim().split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => Ok((owner, name)),
        _ => Err(anyhow!("expected a repository as owner/name, got '{}'", repo)),
    }
}

async fn handle_show(
    app: &mut App,
    client: &GitHubClient,
    config: &AppConfig,
    locale: Locale,
    repo_arg: &str,
    wanted: DetailSections,
    json: bool,
) -> Result<i32> {
    let (owner, name) = match parse_repo_arg(repo_arg) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(1);
        }
    };

    let repository = match client.repository(owner, name).await {
        Ok(repository) => repository,
        Err(e) => {
            if json {
                let envelope = Envelope::from(Err::<Repository, _>(e));
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                eprintln!("❌ {}", e);
            }
            return Ok(1);
        }
    };
    app.repositories_mut().set_current_item(repository);

    // Sub-resources are independent of each other, so fetch them together
    let page = PageRequest::new(1, config.per_page);
    let commits = async {
        if wanted.commits {
            Some(client.repository_commits(owner, name, page).await)
        } else {
            None
        }
    };
    let issues = async {
        if wanted.issues {
            Some(client.repository_issues(owner, name, page).await)
        } else {
            None
        }
    };
    let pulls = async {
        if wanted.pulls {
            Some(client.repository_pulls(owner, name, page).await)
        } else {
            None
        }
    };
    let contents = async {
        match wanted.contents.as_deref() {
            Some(path) => Some(client.repository_contents(owner, name, Some(path)).await),
            None => None,
        }
    };
    let (commits, issues, pulls, contents) = futures::join!(commits, issues, pulls, contents);

    let payload = match app.repositories().current_item() {
        Some(repository) => DetailPayload {
            repository,
            commits: commits.map(Envelope::from),
            issues: issues.map(Envelope::from),
            pulls: pulls.map(Envelope::from),
            contents: contents.map(Envelope::from),
        },
        None => return Err(anyhow!("no repository selected")),
    };
    let any_failed = [
        payload.commits.as_ref().map(|e| e.result),
        payload.issues.as_ref().map(|e| e.result),
        payload.pulls.as_ref().map(|e| e.result),
        payload.contents.as_ref().map(|e| e.result),
    ]
    .contains(&Some(false));

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_detail(&payload, locale);
    }

    app.repositories_mut().clear_current_item();
    Ok(if any_failed { 1 } else { 0 })
}

fn print_detail(payload: &DetailPayload<'_>, locale: Locale) {
    let repo = payload.repository;
    println!("📦 {}", repo.full_name);
    if let Some(description) = &repo.description {
        println!("   {}", description);
    }
    println!("   🔗 {}", repo.html_url);
    println!(
        "   ⭐ {}: {}   🍴 {}: {}   🧑 {}",
        t(locale, Message::Stars),
        repo.stargazers_count,
        t(locale, Message::Forks),
        repo.forks_count,
        repo.owner.login
    );
    println!(
        "   {}: {}   {}: {}",
        t(locale, Message::Language),
        repo.language.as_deref().unwrap_or("-"),
        t(locale, Message::Updated),
        repo.updated_at
    );

    if let Some(envelope) = &payload.commits {
        print_section(t(locale, Message::Commits), envelope, |commits| {
            for commit in commits {
                let summary = commit.commit.message.lines().next().unwrap_or("");
                println!("   {} {}", commit.sha.get(..7).unwrap_or(&commit.sha), truncate(summary, 72));
            }
        });
    }
    if let Some(envelope) = &payload.issues {
        print_section(t(locale, Message::Issues), envelope, |issues| {
            // The issues endpoint also returns pull requests
            for issue in issues.iter().filter(|i| !i.is_pull_request()) {
                println!("   #{:<6} [{}] {}", issue.number, issue.state, truncate(&issue.title, 64));
            }
        });
    }
    if let Some(envelope) = &payload.pulls {
        print_section(t(locale, Message::PullRequests), envelope, |pulls| {
            for pull in pulls {
                let author = pull.user.as_ref().map(|u| u.login.as_str()).unwrap_or("?");
                println!("   #{:<6} {} (@{})", pull.number, truncate(&pull.title, 60), author);
            }
        });
    }
    if let Some(envelope) = &payload.contents {
        print_section(t(locale, Message::Contents), envelope, |contents| match contents {
            Contents::Directory(entries) => {
                for entry in entries {
                    let icon = if entry.kind == "dir" { "📁" } else { "📄" };
                    println!("   {} {}", icon, entry.path);
                }
            }
            Contents::File(entry) => println!("   📄 {} ({} bytes)", entry.path, entry.size),
        });
    }
}

fn print_section<T>(title: &str, envelope: &Envelope<T>, render: impl FnOnce(&T)) {
    println!();
    println!("{}:", title);
    match (&envelope.data, &envelope.message) {
        (Some(data), _) => render(data),
        (None, Some(message)) => println!("   ❌ {}", message),
        (None, None) => {}
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there one App instead of global state?
//    - main() builds it once and passes &mut App to whoever needs it
//    - Nothing else can change the stores behind its back
//    - Tests build their own App with fake storage and a fake GitHub
//
// 2. What is Arc<dyn KeyValueStore>?
//    - dyn Trait = "some type implementing this trait, decided at runtime"
//    - Arc = shared ownership, so App and main can both hold the client
//    - Arc<GitHubClient> converts to Arc<dyn RepoSource> automatically
//
// 3. What does futures::join! do?
//    - Runs several futures at the same time and waits for all of them
//    - Unlike tokio::spawn, the futures can borrow local variables
//
// 4. Why eprintln! for errors?
//    - stderr is separate from stdout
//    - `repo-browser list --json | jq` keeps working even when logs or
//      errors are printed
// -----------------------------------------------------------------------------
