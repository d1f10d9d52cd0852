use url::Url;

use crate::error::{CircleStatsError, Result};

/// Root of the CircleCI v1.1 REST API for GitHub-hosted projects.
pub const DEFAULT_API_ROOT: &str = "https://circleci.com/api/v1.1/project/github";

/// Runtime configuration, resolved once at startup and passed by reference
/// into the API client.
///
/// The CLI layer resolves `project` and `key` from explicit flags first and
/// the `CIRCLECI_PROJECT`/`CIRCLECI_KEY` environment variables second (via
/// clap's `env` attribute); construction fails before any network call when
/// either is still missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CircleCI REST API
    pub api_root: String,
    /// Project slug, e.g. "org/repo"
    pub project: String,
    /// API key, sent as the basic-auth username with an empty password
    pub key: String,
}

impl Config {
    /// Builds a configuration against the default API root.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `project` or `key` is missing.
    pub fn new(project: Option<String>, key: Option<String>) -> Result<Self> {
        Self::with_api_root(DEFAULT_API_ROOT.to_string(), project, key)
    }

    /// Builds a configuration against an explicit API root. Tests point this
    /// at a local mock server.
    pub fn with_api_root(
        api_root: String,
        project: Option<String>,
        key: Option<String>,
    ) -> Result<Self> {
        Url::parse(&api_root)
            .map_err(|e| CircleStatsError::Config(format!("Invalid API root {api_root:?}: {e}")))?;

        let project = project.ok_or_else(|| {
            CircleStatsError::Config(
                "no project given; pass --project or set CIRCLECI_PROJECT".to_string(),
            )
        })?;

        let key = key.ok_or_else(|| {
            CircleStatsError::Config("no API key given; pass --key or set CIRCLECI_KEY".to_string())
        })?;

        Ok(Self {
            api_root,
            project,
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_resolves_explicit_values() {
        let config = Config::new(Some("org/repo".to_string()), Some("k".to_string())).unwrap();
        assert_eq!(config.api_root, DEFAULT_API_ROOT);
        assert_eq!(config.project, "org/repo");
        assert_eq!(config.key, "k");
    }

    #[test]
    fn test_config_missing_project_fails() {
        let result = Config::new(None, Some("k".to_string()));
        assert!(matches!(result, Err(CircleStatsError::Config(_))));
        assert!(result.unwrap_err().to_string().contains("--project"));
    }

    #[test]
    fn test_config_missing_key_fails() {
        let result = Config::new(Some("org/repo".to_string()), None);
        assert!(matches!(result, Err(CircleStatsError::Config(_))));
        assert!(result.unwrap_err().to_string().contains("--key"));
    }

    #[test]
    fn test_config_rejects_invalid_api_root() {
        let result = Config::with_api_root(
            "not a url".to_string(),
            Some("org/repo".to_string()),
            Some("k".to_string()),
        );
        assert!(matches!(result, Err(CircleStatsError::Config(_))));
    }
}
