use std::sync::LazyLock;

use depdocs::{Document, Hints, PackageRef, Source, SourceError};
use regex::Regex;

use crate::client::RegistryClient;
use crate::content::ReadmeResponse;

/// Branches tried on the raw host before falling back to the REST API.
const RAW_BRANCHES: &[&str] = &["main", "master"];

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[/:]([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)")
        .expect("GitHub URL pattern is valid")
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:github:)?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$")
        .expect("shorthand pattern is valid")
});

/// A GitHub repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    /// Extract owner/repo from the many shapes repository links take:
    /// `https://github.com/o/r`, `git+https://github.com/o/r.git`,
    /// `git@github.com:o/r.git`, `github:o/r` and bare `o/r`.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let caps = GITHUB_URL
            .captures(url)
            .or_else(|| SHORTHAND.captures(url))?;

        let owner = caps.get(1)?.as_str();
        let name = caps.get(2)?.as_str();
        let name = name.strip_suffix(".git").unwrap_or(name);
        if owner.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Fetches repository READMEs from GitHub.
#[derive(Debug, Clone)]
pub struct GitHubReadmeClient {
    client: RegistryClient,
}

impl GitHubReadmeClient {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    fn raw_url(&self, repo: &Repo, branch: &str, file: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.client.config().github_raw_url,
            repo.owner,
            repo.name,
            branch,
            file
        )
    }

    /// Rewrite a `github.com/<o>/<r>/blob/<ref>/<path>` link to its raw form.
    pub fn raw_url_for_blob(&self, url: &str) -> Option<String> {
        let (_, after) = url.split_once("github.com/")?;
        let mut parts = after.splitn(4, '/');
        let owner = parts.next()?;
        let repo = parts.next()?;
        if parts.next()? != "blob" {
            return None;
        }
        let rest = parts.next()?;
        Some(format!(
            "{}/{owner}/{repo}/{rest}",
            self.client.config().github_raw_url
        ))
    }

    /// Fetch the README, returning its text and a URL describing where it
    /// came from.
    pub async fn readme(&self, repo: &Repo) -> Result<(String, String), SourceError> {
        for &branch in RAW_BRANCHES {
            let url = self.raw_url(repo, branch, "README.md");
            match self.client.get_text(&url).await {
                Ok(body) => return Ok((body, repo.html_url())),
                Err(e) => {
                    tracing::debug!(repo = %repo.html_url(), branch, error = %e, "raw README miss");
                }
            }
        }

        self.readme_from_api(repo).await
    }

    /// The REST endpoint resolves the default branch and any README filename.
    async fn readme_from_api(&self, repo: &Repo) -> Result<(String, String), SourceError> {
        let url = format!(
            "{}/repos/{}/{}/readme",
            self.client.config().github_api_url,
            repo.owner,
            repo.name
        );

        let mut request = self
            .client
            .request(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.client.config().github_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response: ReadmeResponse = self
            .client
            .send(request, &url)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let body = response.decode()?;
        let html_url = response
            .html_url
            .clone()
            .unwrap_or_else(|| repo.html_url());
        Ok((body, html_url))
    }
}

/// Chain step: the README of the repository an earlier registry lookup
/// linked to.
pub struct GitHubSource {
    readme: GitHubReadmeClient,
}

impl GitHubSource {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            readme: GitHubReadmeClient::new(client),
        }
    }
}

#[async_trait::async_trait]
impl Source for GitHubSource {
    fn label(&self) -> &str {
        "GitHub"
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        let mut repos: Vec<Repo> = Vec::new();
        for url in &hints.repository_urls {
            if let Some(repo) = Repo::parse(url)
                && !repos.contains(&repo)
            {
                repos.push(repo);
            }
        }

        let mut last_error =
            SourceError::NotFound(format!("no GitHub repository linked from {package}"));

        for repo in &repos {
            match self.readme.readme(repo).await {
                Ok((body, source_url)) => {
                    return Ok(Document {
                        body,
                        version: hints.version.clone(),
                        source_url,
                        source_label: self.label().to_owned(),
                    });
                }
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::RegistryConfig;

    use super::*;

    fn repo(owner: &str, name: &str) -> Repo {
        Repo {
            owner: owner.into(),
            name: name.into(),
        }
    }

    #[test]
    fn parses_repository_url_shapes() {
        let expected = repo("pallets", "flask");
        for url in [
            "https://github.com/pallets/flask",
            "https://github.com/pallets/flask/",
            "https://github.com/pallets/flask.git",
            "git+https://github.com/pallets/flask.git",
            "git@github.com:pallets/flask.git",
            "https://github.com/pallets/flask/tree/main/src",
            "github:pallets/flask",
            "pallets/flask",
        ] {
            assert_eq!(Repo::parse(url), Some(expected.clone()), "failed on {url}");
        }
    }

    #[test]
    fn rejects_non_github_urls() {
        assert_eq!(Repo::parse("https://gitlab.com/org/project"), None);
        assert_eq!(Repo::parse("https://flask.palletsprojects.com/"), None);
        assert_eq!(Repo::parse(""), None);
    }

    fn client_for(server: &MockServer) -> RegistryClient {
        RegistryClient::new(RegistryConfig::with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn rewrites_blob_links() {
        let client = GitHubReadmeClient::new(
            RegistryClient::new(RegistryConfig::default()).unwrap(),
        );
        assert_eq!(
            client.raw_url_for_blob("https://github.com/tokio-rs/axum/blob/main/axum/README.md"),
            Some("https://raw.githubusercontent.com/tokio-rs/axum/main/axum/README.md".into())
        );
        assert_eq!(client.raw_url_for_blob("https://github.com/tokio-rs/axum"), None);
    }

    #[tokio::test]
    async fn readme_from_main_branch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pallets/flask/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Flask"))
            .mount(&server)
            .await;

        let client = GitHubReadmeClient::new(client_for(&server));
        let (body, url) = client.readme(&repo("pallets", "flask")).await.unwrap();
        assert_eq!(body, "# Flask");
        assert_eq!(url, "https://github.com/pallets/flask");
    }

    #[tokio::test]
    async fn readme_falls_back_to_master() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/psf/requests/main/README.md"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/psf/requests/master/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Requests"))
            .mount(&server)
            .await;

        let client = GitHubReadmeClient::new(client_for(&server));
        let (body, _) = client.readme(&repo("psf", "requests")).await.unwrap();
        assert_eq!(body, "# Requests");
    }

    #[tokio::test]
    async fn readme_falls_back_to_api_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/sqlalchemy/sqlalchemy/readme"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "README.rst",
                "content": "U1FMQWxjaGVteQ==\n",
                "encoding": "base64",
                "html_url": "https://github.com/sqlalchemy/sqlalchemy/blob/main/README.rst"
            })))
            .mount(&server)
            .await;

        let config = RegistryConfig::with_base_url(server.uri())
            .with_github_token(Some("secret".into()));
        let client = GitHubReadmeClient::new(RegistryClient::new(config).unwrap());
        let (body, url) = client
            .readme(&repo("sqlalchemy", "sqlalchemy"))
            .await
            .unwrap();
        assert_eq!(body, "SQLAlchemy");
        assert_eq!(
            url,
            "https://github.com/sqlalchemy/sqlalchemy/blob/main/README.rst"
        );
    }

    #[tokio::test]
    async fn source_without_repository_hint_fails() {
        let server = MockServer::start().await;
        let source = GitHubSource::new(client_for(&server));
        let mut hints = Hints::default();
        hints.add_repository_url("https://example.com/not-github");

        let result = source.fetch(&PackageRef::python("flask"), &mut hints).await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn source_uses_hinted_repository_and_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/axios/axios/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# axios"))
            .mount(&server)
            .await;

        let source = GitHubSource::new(client_for(&server));
        let mut hints = Hints {
            version: Some("1.6.8".into()),
            ..Hints::default()
        };
        hints.add_repository_url("git+https://github.com/axios/axios.git");

        let doc = source.fetch(&PackageRef::npm("axios"), &mut hints).await.unwrap();
        assert_eq!(doc.body, "# axios");
        assert_eq!(doc.version.as_deref(), Some("1.6.8"));
        assert_eq!(doc.source_label, "GitHub");
        assert_eq!(doc.source_url, "https://github.com/axios/axios");
    }
}
