// src/github/endpoints.rs
// Paths of the GitHub REST endpoints, relative to the API base URL.

pub const SEARCH_REPOS: &str = "/search/repositories";

pub fn user_repos(user: &str) -> String {
    format!("/users/{}/repos", user)
}

pub fn repo(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}", owner, repo)
}

pub fn repo_contents(owner: &str, repo: &str, path: Option<&str>) -> String {
    match path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(path) => format!("/repos/{}/{}/contents/{}", owner, repo, path),
        None => format!("/repos/{}/{}/contents", owner, repo),
    }
}

pub fn repo_commits(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}/commits", owner, repo)
}

pub fn repo_issues(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}/issues", owner, repo)
}

pub fn repo_pulls(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}/pulls", owner, repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_repos_path() {
        assert_eq!(user_repos("facebook"), "/users/facebook/repos");
    }

    #[test]
    fn test_contents_path_with_and_without_subpath() {
        assert_eq!(repo_contents("o", "r", None), "/repos/o/r/contents");
        assert_eq!(repo_contents("o", "r", Some("")), "/repos/o/r/contents");
        assert_eq!(
            repo_contents("o", "r", Some("/docs/guide/")),
            "/repos/o/r/contents/docs/guide"
        );
    }
}
