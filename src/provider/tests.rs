use super::*;
use crate::config::ScannerConfig;
use crate::contract::{EntryKind, TreeEntry};
use mockito::{Matcher, Server};

fn config_for(server: &Server) -> ScannerConfig {
    ScannerConfig::new()
        .with_github_api(server.url())
        .with_gitlab_api(format!("{}/api/v4", server.url()))
}

/// Match a GitLab project route whether or not the server decodes `%2F`
fn gitlab_path(group: &str, project: &str, rest: &str) -> Matcher {
    Matcher::Regex(format!(
        "^/api/v4/projects/{}(%2F|/){}{}$",
        group, project, rest
    ))
}

// ========================================================================
// ProviderKind tests
// ========================================================================

#[test]
fn test_detect_by_host_substring() {
    assert_eq!(ProviderKind::detect("https://github.com/acme/widgets"), Some(ProviderKind::GitHub));
    assert_eq!(ProviderKind::detect("git@gitlab.com:acme/widgets.git"), Some(ProviderKind::GitLab));
    assert_eq!(ProviderKind::detect("https://bitbucket.org/acme/widgets"), None);
    assert_eq!(ProviderKind::detect(""), None);
}

#[test]
fn test_detect_prefers_github_when_both_present() {
    let url = "https://github.com/acme/mirror-of-gitlab.com-project";
    assert_eq!(ProviderKind::detect(url), Some(ProviderKind::GitHub));
}

#[test]
fn test_kind_display_and_parse() {
    assert_eq!(ProviderKind::GitHub.to_string(), "GitHub");
    assert_eq!(ProviderKind::GitLab.as_str(), "gitlab");
    assert_eq!("GitLab".parse::<ProviderKind>().unwrap(), ProviderKind::GitLab);
    assert!("bitbucket".parse::<ProviderKind>().is_err());
}

// ========================================================================
// RepositoryReference tests
// ========================================================================

#[test]
fn test_parse_github_url() {
    let repo = RepositoryReference::parse_github("https://github.com/acme/widgets", "main", None)
        .unwrap();
    assert_eq!(repo.kind, ProviderKind::GitHub);
    assert_eq!(repo.owner, "acme");
    assert_eq!(repo.name, "widgets");
    assert_eq!(repo.branch, "main");
    assert_eq!(repo.access_token, None);
}

#[test]
fn test_parse_github_url_variants() {
    let cases = vec![
        ("https://github.com/acme/widgets.git", "widgets"),
        ("https://github.com/acme/widgets/tree/dev/contracts", "widgets"),
        ("https://www.github.com/acme/widgets?tab=readme", "widgets"),
        ("github.com/acme/widgets#readme", "widgets"),
    ];

    for (url, expected) in cases {
        let repo = RepositoryReference::parse_github(url, "main", None).unwrap();
        assert_eq!(repo.owner, "acme", "Failed for {}", url);
        assert_eq!(repo.name, expected, "Failed for {}", url);
    }
}

#[test]
fn test_parse_github_url_rejects_bad_shape() {
    for url in ["https://github.com/acme", "https://github.com/", "https://github.com/acme/"] {
        let err = RepositoryReference::parse_github(url, "main", None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid GitHub URL format", "Failed for {}", url);
    }
}

#[test]
fn test_parse_gitlab_nested_groups() {
    let repo = RepositoryReference::parse_gitlab(
        "https://gitlab.com/acme/defi/vaults/-/tree/main",
        "main",
        Some("glpat-123"),
    )
    .unwrap();
    assert_eq!(repo.owner, "acme/defi");
    assert_eq!(repo.name, "vaults");
    assert_eq!(repo.full_name(), "acme/defi/vaults");
    assert_eq!(repo.project_id(), "acme%2Fdefi%2Fvaults");
    assert_eq!(repo.access_token.as_deref(), Some("glpat-123"));
}

#[test]
fn test_parse_gitlab_strips_git_suffix_and_slash() {
    let repo =
        RepositoryReference::parse_gitlab("https://gitlab.com/acme/widgets.git/", "dev", None)
            .unwrap();
    assert_eq!(repo.project_id(), "acme%2Fwidgets");
    assert_eq!(repo.branch, "dev");
}

#[test]
fn test_parse_gitlab_rejects_single_segment() {
    let err = RepositoryReference::parse_gitlab("https://gitlab.com/acme", "main", None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid GitLab URL format");
}

#[test]
fn test_empty_token_treated_as_absent() {
    let repo =
        RepositoryReference::parse_github("https://github.com/a/b", "main", Some("")).unwrap();
    assert!(repo.access_token.is_none());
}

#[test]
fn test_debug_redacts_token() {
    let repo = RepositoryReference::parse_github("https://github.com/a/b", "main", Some("s3cret"))
        .unwrap();
    let debug = format!("{:?}", repo);
    assert!(!debug.contains("s3cret"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_encode_component_matches_uri_component_rules() {
    assert_eq!(encode_component("contracts/Token.sol"), "contracts%2FToken.sol");
    assert_eq!(encode_component("a b&c"), "a%20b%26c");
    assert_eq!(encode_component("keep-_.!~*'()"), "keep-_.!~*'()");
    assert_eq!(encode_component("토큰"), "%ED%86%A0%ED%81%B0");
}

#[test]
fn test_scan_error_status() {
    let err = ScanError::Api {
        provider: ProviderKind::GitLab,
        status: 500,
    };
    assert_eq!(err.to_string(), "GitLab API error: 500");
    assert_eq!(err.status(), Some(500));
    assert_eq!(ScanError::UnsupportedProvider.status(), None);
}

// ========================================================================
// Registry tests
// ========================================================================

#[test]
fn test_registry_defaults_and_select() {
    let registry = ProviderRegistry::with_defaults(&ScannerConfig::default()).unwrap();
    for kind in ProviderKind::ALL {
        assert_eq!(registry.get(kind).unwrap().kind(), kind);
    }

    let selected = registry.select("https://gitlab.com/a/b").unwrap();
    assert_eq!(selected.kind(), ProviderKind::GitLab);
    assert!(registry.select("https://example.com/a/b").is_none());
}

#[test]
fn test_registry_register_replaces_same_kind() {
    let config = ScannerConfig::default();
    let mut registry = ProviderRegistry::new();
    assert!(registry.select("https://github.com/a/b").is_none());

    registry.register(GitHubClient::new(&config).unwrap());
    registry.register(GitHubClient::new(&config).unwrap());
    assert_eq!(
        registry.select("https://github.com/a/b").unwrap().kind(),
        ProviderKind::GitHub
    );
    assert!(registry.get(ProviderKind::GitLab).is_none());
}

// ========================================================================
// GitHub client tests
// ========================================================================

#[tokio::test]
async fn test_github_tree_sends_headers_and_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/acme/widgets/git/trees/main")
        .match_query(Matcher::UrlEncoded("recursive".into(), "1".into()))
        .match_header("accept", "application/vnd.github.v3+json")
        .match_header("user-agent", "CyberChari-Audit-Platform")
        .match_header("authorization", "token ghp_abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"sha":"x","tree":[
                {"path":"contracts","type":"tree","mode":"040000"},
                {"path":"contracts/Token.sol","type":"blob","mode":"100644"}
            ],"truncated":false}"#,
        )
        .create_async()
        .await;

    let client = GitHubClient::new(&config_for(&server)).unwrap();
    let repo = client
        .locate("https://github.com/acme/widgets", "main", Some("ghp_abc"))
        .unwrap();
    let tree = client.list_tree(&repo).await.unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].kind, EntryKind::Tree);
    assert_eq!(tree[1].path, "contracts/Token.sol");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_github_anonymous_request_has_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/acme/widgets")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = GitHubClient::new(&config_for(&server)).unwrap();
    let repo = client.locate("https://github.com/acme/widgets", "main", None).unwrap();
    assert!(client.check_access(&repo).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_github_tree_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/widgets/git/trees/main")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let client = GitHubClient::new(&config_for(&server)).unwrap();
    let repo = client.locate("https://github.com/acme/widgets", "main", None).unwrap();
    let err = client.list_tree(&repo).await.unwrap_err();
    assert_eq!(err.to_string(), "GitHub API error: 404");
}

#[tokio::test]
async fn test_github_content_rejects_unknown_encoding() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/widgets/contents/Big.sol")
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .with_status(200)
        .with_body(r#"{"content":"","encoding":"none"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&config_for(&server)).unwrap();
    let repo = client.locate("https://github.com/acme/widgets", "main", None).unwrap();
    let err = client.fetch_content(&repo, "Big.sol").await.unwrap_err();
    assert!(err.to_string().contains("unsupported content encoding"));
}

// ========================================================================
// GitLab client tests
// ========================================================================

#[tokio::test]
async fn test_gitlab_raw_content_uses_bearer_and_encoded_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            Matcher::Regex(r"^/api/v4/projects/acme(%2F|/)widgets/repository/files/src(%2F|/)Vault\.vy/raw$".into()),
        )
        .match_query(Matcher::UrlEncoded("ref".into(), "dev".into()))
        .match_header("authorization", "Bearer glpat-xyz")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body("# pragma version ^0.4.0\n")
        .create_async()
        .await;

    let client = GitLabClient::new(&config_for(&server)).unwrap();
    let repo = client
        .locate("https://gitlab.com/acme/widgets", "dev", Some("glpat-xyz"))
        .unwrap();
    let content = client.fetch_content(&repo, "src/Vault.vy").await.unwrap();

    assert_eq!(content, "# pragma version ^0.4.0\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gitlab_tree_follows_next_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", gitlab_path("acme", "widgets", "/repository/tree"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("recursive".into(), "true".into()),
            Matcher::UrlEncoded("ref".into(), "main".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("x-next-page", "2")
        .with_body(r#"[{"id":"a","name":"A.sol","type":"blob","path":"A.sol","mode":"100644"}]"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", gitlab_path("acme", "widgets", "/repository/tree"))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("x-next-page", "")
        .with_body(r#"[{"id":"b","name":"lib","type":"tree","path":"lib","mode":"040000"}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = GitLabClient::new(&config_for(&server)).unwrap();
    let repo = client.locate("https://gitlab.com/acme/widgets", "main", None).unwrap();
    let tree = client.list_tree(&repo).await.unwrap();

    assert_eq!(tree, vec![TreeEntry::blob("A.sol"), TreeEntry::tree("lib")]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_gitlab_check_access_false_on_404() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", gitlab_path("acme", "private", ""))
        .with_status(404)
        .create_async()
        .await;

    let client = GitLabClient::new(&config_for(&server)).unwrap();
    let repo = client.locate("https://gitlab.com/acme/private", "main", None).unwrap();
    assert!(!client.check_access(&repo).await.unwrap());
}
