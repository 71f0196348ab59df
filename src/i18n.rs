// src/i18n.rs
// =============================================================================
// Localized user-facing text (English and Russian).
//
// Language choice, in order:
// 1. whatever the user saved with `repo-browser language <code>`
// 2. the best match for the LANG environment variable (e.g. "en_US.UTF-8")
// 3. Russian
// =============================================================================

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    En,
    Ru,
}

pub const FALLBACK_LOCALE: Locale = Locale::Ru;

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Picks the language to use for this run.
    pub fn detect(stored: Option<Locale>, lang_env: Option<&str>) -> Locale {
        stored
            .or_else(|| lang_env.and_then(best_match))
            .unwrap_or(FALLBACK_LOCALE)
    }
}

// "en_US.UTF-8" / "ru-RU" / "en" -> Locale
fn best_match(tag: &str) -> Option<Locale> {
    let primary = tag.split(&['_', '-', '.'][..]).next()?.to_ascii_lowercase();
    primary.parse().ok()
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    LoginSuccess,
    LoginFailed,
    RegisterSuccess,
    LogoutSuccess,
    NotSignedIn,
    SignedInAs,
    ProfileUpdated,
    NoRepositories,
    MoreAvailable,
    EndOfList,
    FetchFailed,
    Total,
    Name,
    Stars,
    Forks,
    Language,
    Updated,
    ThemeCurrent,
    ThemeSaved,
    LanguageCurrent,
    LanguageSaved,
    Commits,
    Issues,
    PullRequests,
    Contents,
}

pub fn t(locale: Locale, message: Message) -> &'static str {
    use Message::*;
    match (locale, message) {
        (Locale::En, LoginSuccess) => "Signed in successfully",
        (Locale::Ru, LoginSuccess) => "Вход выполнен успешно",
        (Locale::En, LoginFailed) => "Invalid email or password",
        (Locale::Ru, LoginFailed) => "Неверный email или пароль",
        (Locale::En, RegisterSuccess) => "Account created",
        (Locale::Ru, RegisterSuccess) => "Аккаунт создан",
        (Locale::En, LogoutSuccess) => "Signed out",
        (Locale::Ru, LogoutSuccess) => "Вы вышли из аккаунта",
        (Locale::En, NotSignedIn) => "You are not signed in",
        (Locale::Ru, NotSignedIn) => "Вы не вошли в систему",
        (Locale::En, SignedInAs) => "Signed in as",
        (Locale::Ru, SignedInAs) => "Вы вошли как",
        (Locale::En, ProfileUpdated) => "Profile updated",
        (Locale::Ru, ProfileUpdated) => "Профиль обновлён",
        (Locale::En, NoRepositories) => "No repositories found",
        (Locale::Ru, NoRepositories) => "Репозитории не найдены",
        (Locale::En, MoreAvailable) => "More repositories available (use --pages to load more)",
        (Locale::Ru, MoreAvailable) => "Есть ещё репозитории (используйте --pages)",
        (Locale::En, EndOfList) => "No more repositories",
        (Locale::Ru, EndOfList) => "Больше репозиториев нет",
        (Locale::En, FetchFailed) => "Failed to fetch repositories",
        (Locale::Ru, FetchFailed) => "Не удалось загрузить репозитории",
        (Locale::En, Total) => "Total",
        (Locale::Ru, Total) => "Всего",
        (Locale::En, Name) => "Name",
        (Locale::Ru, Name) => "Название",
        (Locale::En, Stars) => "Stars",
        (Locale::Ru, Stars) => "Звёзды",
        (Locale::En, Forks) => "Forks",
        (Locale::Ru, Forks) => "Форки",
        (Locale::En, Language) => "Language",
        (Locale::Ru, Language) => "Язык",
        (Locale::En, Updated) => "Updated",
        (Locale::Ru, Updated) => "Обновлён",
        (Locale::En, ThemeCurrent) => "Theme",
        (Locale::Ru, ThemeCurrent) => "Тема",
        (Locale::En, ThemeSaved) => "Theme saved",
        (Locale::Ru, ThemeSaved) => "Тема сохранена",
        (Locale::En, LanguageCurrent) => "Interface language",
        (Locale::Ru, LanguageCurrent) => "Язык интерфейса",
        (Locale::En, LanguageSaved) => "Language saved",
        (Locale::Ru, LanguageSaved) => "Язык сохранён",
        (Locale::En, Commits) => "Commits",
        (Locale::Ru, Commits) => "Коммиты",
        (Locale::En, Issues) => "Issues",
        (Locale::Ru, Issues) => "Задачи",
        (Locale::En, PullRequests) => "Pull requests",
        (Locale::Ru, PullRequests) => "Пул-реквесты",
        (Locale::En, Contents) => "Contents",
        (Locale::Ru, Contents) => "Файлы",
    }
}
