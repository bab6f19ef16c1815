//! Server configuration
//!
//! Secrets come from the process environment. None of them are required to
//! start: missing Notion credentials surface as upstream errors, missing
//! identity-provider credentials hide that provider from the sign-in page.

use minivault_notion::DEFAULT_BASE_URL;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment-supplied secrets
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub github_id: Option<String>,
    pub github_secret: Option<String>,
    pub auth_url: Option<String>,
    pub auth_secret: Option<String>,
    pub notion_api_key: Option<String>,
    pub notion_database_id: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Secrets")
            .field("google_client_id", &mask(&self.google_client_id))
            .field("google_client_secret", &mask(&self.google_client_secret))
            .field("github_id", &mask(&self.github_id))
            .field("github_secret", &mask(&self.github_secret))
            .field("auth_url", &self.auth_url)
            .field("auth_secret", &mask(&self.auth_secret))
            .field("notion_api_key", &mask(&self.notion_api_key))
            .field("notion_database_id", &mask(&self.notion_database_id))
            .finish()
    }
}

impl Secrets {
    /// Environment variable names, in field order
    pub const VARS: [&'static str; 8] = [
        "GOOGLE_CLIENT_ID",
        "GOOGLE_CLIENT_SECRET",
        "GITHUB_ID",
        "GITHUB_SECRET",
        "NEXTAUTH_URL",
        "NEXTAUTH_SECRET",
        "NOTION_API_KEY",
        "NOTION_DATABASE_ID",
    ];

    /// Read from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary lookup; empty values count as unset
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: get("GOOGLE_CLIENT_SECRET"),
            github_id: get("GITHUB_ID"),
            github_secret: get("GITHUB_SECRET"),
            auth_url: get("NEXTAUTH_URL"),
            auth_secret: get("NEXTAUTH_SECRET"),
            notion_api_key: get("NOTION_API_KEY"),
            notion_database_id: get("NOTION_DATABASE_ID"),
        }
    }

    /// Names of unset variables
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let values = [
            &self.google_client_id,
            &self.google_client_secret,
            &self.github_id,
            &self.github_secret,
            &self.auth_url,
            &self.auth_secret,
            &self.notion_api_key,
            &self.notion_database_id,
        ];
        Self::VARS
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect()
    }

    /// Identity providers with both client id and secret configured
    #[must_use]
    pub fn providers(&self) -> Vec<AuthProvider> {
        let mut providers = Vec::new();
        if self.google_client_id.is_some() && self.google_client_secret.is_some() {
            providers.push(AuthProvider::Google);
        }
        if self.github_id.is_some() && self.github_secret.is_some() {
            providers.push(AuthProvider::Github);
        }
        providers
    }
}

/// External identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProvider {
    Google,
    Github,
}

impl AuthProvider {
    /// Provider id used in sign-in URLs
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }

    /// Display name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
        }
    }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Root of persisted data (`feedbacks/` lives below it)
    pub data_dir: PathBuf,
    /// Optional project config file (`.toml` or `.json`)
    pub project_config: Option<PathBuf>,
    /// Notion API endpoint
    pub notion_base_url: String,
    /// Identity provider hosting `/api/auth/signin/<provider>`; sign-in
    /// links are only rendered when it is known
    pub identity_url: Option<String>,
    /// Environment secrets
    pub secrets: Secrets,
}

impl ServerConfig {
    /// Configuration with defaults and the given secrets
    #[must_use]
    pub fn new(secrets: Secrets) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            project_config: None,
            notion_base_url: DEFAULT_BASE_URL.to_string(),
            identity_url: None,
            secrets,
        }
    }

    /// Public base URL; section data is fetched from here
    #[must_use]
    pub fn public_url(&self) -> String {
        self.secrets
            .auth_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind))
    }

    /// Log a warning for every unset secret
    pub fn warn_missing(&self) {
        for name in self.secrets.missing() {
            tracing::warn!(var = name, "environment variable not set");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_values_are_unset() {
        let secrets = Secrets::from_lookup(lookup(&[("NOTION_API_KEY", "  "), ("GITHUB_ID", "gh")]));
        assert_eq!(secrets.notion_api_key, None);
        assert_eq!(secrets.github_id.as_deref(), Some("gh"));
        assert!(secrets.missing().contains(&"NOTION_API_KEY"));
        assert!(!secrets.missing().contains(&"GITHUB_ID"));
    }

    #[test]
    fn providers_need_id_and_secret() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("GOOGLE_CLIENT_ID", "g"),
            ("GOOGLE_CLIENT_SECRET", "gs"),
            ("GITHUB_ID", "gh"),
        ]));
        assert_eq!(secrets.providers(), vec![AuthProvider::Google]);
    }

    #[test]
    fn debug_masks_secret_values() {
        let secrets = Secrets::from_lookup(lookup(&[("NOTION_API_KEY", "super-secret")]));
        let rendered = format!("{secrets:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<set>"));
    }

    #[test]
    fn public_url_falls_back_to_bind() {
        let config = ServerConfig::new(Secrets::default());
        assert_eq!(config.public_url(), "http://127.0.0.1:3000");

        let config = ServerConfig::new(Secrets::from_lookup(lookup(&[(
            "NEXTAUTH_URL",
            "https://vault.example.com",
        )])));
        assert_eq!(config.public_url(), "https://vault.example.com");
    }
}
