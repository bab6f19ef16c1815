//! Shared application state
//!
//! Built once at the composition root and cloned into every route. The
//! session resolver and fetch cache are passed in explicitly rather than
//! reached through globals.

use crate::error::StartupError;
use crate::settings::{AuthProvider, ServerConfig};
use minivault_core::{FeedbackStore, ProjectConfig, SessionRegistry, SessionResolver};
use minivault_fetch::{FetchCache, HttpFetcher};
use minivault_notion::NotionClient;
use std::sync::Arc;

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    pub project: Arc<ProjectConfig>,
    pub feedback: FeedbackStore,
    pub notion: NotionClient,
    pub sessions: Arc<dyn SessionResolver>,
    pub fetch: Arc<FetchCache>,
    pub providers: Arc<[AuthProvider]>,
    pub auth_url: String,
    /// Token registry the identity provider binds sessions into
    pub registry: Option<Arc<SessionRegistry>>,
    /// Bearer secret required to bind or revoke tokens
    pub session_secret: Option<Arc<str>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("project", &self.project.name)
            .field("feedback_dir", &self.feedback.dir())
            .field("notion", &self.notion.base_url())
            .field("providers", &self.providers)
            .field("session_binding", &self.registry.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state from parts
    #[must_use]
    pub fn new(
        project: ProjectConfig,
        feedback: FeedbackStore,
        notion: NotionClient,
        sessions: Arc<dyn SessionResolver>,
        fetch: Arc<FetchCache>,
    ) -> Self {
        Self {
            project: Arc::new(project),
            feedback,
            notion,
            sessions,
            fetch,
            providers: Arc::from(Vec::new()),
            auth_url: String::new(),
            registry: None,
            session_secret: None,
        }
    }

    /// With identity providers listed on the sign-in page
    #[must_use]
    pub fn with_providers(mut self, providers: Vec<AuthProvider>, auth_url: impl Into<String>) -> Self {
        self.providers = Arc::from(providers);
        self.auth_url = auth_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Resolve sessions from `registry` and accept token bindings signed
    /// with `secret` on `/api/auth/session`
    #[must_use]
    pub fn with_session_registry(
        mut self,
        registry: Arc<SessionRegistry>,
        secret: Option<String>,
    ) -> Self {
        self.sessions = registry.clone();
        self.registry = Some(registry);
        self.session_secret = secret.map(Arc::from);
        self
    }

    /// Replace the session resolver, leaving token binding as configured
    #[must_use]
    pub fn with_resolver(mut self, sessions: Arc<dyn SessionResolver>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Build production state from configuration
    ///
    /// Loads the project config, prepares the feedback directory, wires the
    /// fetch cache against the server's own public URL and resolves sessions
    /// from a registry bound through `/api/auth/session`.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let project = match &config.project_config {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading project config");
                ProjectConfig::load(path)?
            }
            None => ProjectConfig::default(),
        };

        let feedback = FeedbackStore::new(&config.data_dir);
        feedback.ensure_dir().await?;

        let notion = NotionClient::with_base_url(
            config.notion_base_url.clone(),
            config.secrets.notion_api_key.clone(),
            config.secrets.notion_database_id.clone(),
        );

        let fetch = Arc::new(FetchCache::new(Arc::new(HttpFetcher::new(config.public_url()))));
        let registry = Arc::new(SessionRegistry::new());

        let mut state = Self::new(project, feedback, notion, registry.clone(), fetch)
            .with_session_registry(registry, config.secrets.auth_secret.clone());
        if let Some(identity_url) = &config.identity_url {
            state = state.with_providers(config.secrets.providers(), identity_url.clone());
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Secrets;

    #[tokio::test]
    async fn from_config_enables_session_binding() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::new(Secrets {
            auth_secret: Some("s3cret".into()),
            github_id: Some("gh".into()),
            github_secret: Some("ghs".into()),
            ..Secrets::default()
        });
        config.data_dir = tmp.path().to_path_buf();

        let state = AppState::from_config(&config).await.unwrap();
        assert!(state.registry.is_some());
        assert_eq!(state.session_secret.as_deref(), Some("s3cret"));
        assert!(state.providers.is_empty());
        assert!(tmp.path().join("feedbacks").is_dir());

        config.identity_url = Some("https://id.example.com/".into());
        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(&*state.providers, &[AuthProvider::Github]);
        assert_eq!(state.auth_url, "https://id.example.com");
    }
}
