//! Per-deployment project configuration
//!
//! A [`ProjectConfig`] names the project and links it to the external
//! resources the dashboard sections read from. It is loaded once at startup
//! and never mutated afterwards.

use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default project name when no config file is supplied
pub const DEFAULT_PROJECT_NAME: &str = "MiniVault";

fn default_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

/// Project configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Display name
    #[serde(default = "default_name")]
    pub name: String,
    /// Optional one-line description shown on the overview
    #[serde(default)]
    pub description: Option<String>,
    /// Linked GitHub repository
    #[serde(default)]
    pub github: Option<GithubRepo>,
    /// Linked Google Drive folder
    #[serde(default)]
    pub google_drive: Option<DriveFolder>,
    /// Notion database ids per category
    #[serde(default)]
    pub notion_databases: NotionDatabases,
    /// Free-form links shown on the overview
    #[serde(default)]
    pub custom_links: Vec<CustomLink>,
    /// Weekly report entries shown in the reports section
    #[serde(default)]
    pub weekly_reports: Vec<WeeklyReport>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            github: None,
            google_drive: None,
            notion_databases: NotionDatabases::default(),
            custom_links: Vec::new(),
            weekly_reports: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Load from a `.toml` or `.json` file, chosen by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&raw),
            Some("json") => Self::from_json_str(&raw),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Parse from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Parse from JSON text
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Weekly reports sorted by date, newest first
    #[must_use]
    pub fn reports_newest_first(&self) -> Vec<&WeeklyReport> {
        let mut reports: Vec<&WeeklyReport> = self.weekly_reports.iter().collect();
        reports.sort_by(|a, b| b.date.cmp(&a.date));
        reports
    }
}

/// GitHub owner/repo pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl GithubRepo {
    /// Public web URL of the repository
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

/// Google Drive folder reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFolder {
    pub folder_id: String,
}

/// Notion database categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotionCategory {
    Tasks,
    Goals,
    Milestones,
    Documents,
    Feedback,
    Metrics,
    Sales,
    CustomMetrics,
}

impl NotionCategory {
    /// Every category, in declaration order
    pub const ALL: [NotionCategory; 8] = [
        Self::Tasks,
        Self::Goals,
        Self::Milestones,
        Self::Documents,
        Self::Feedback,
        Self::Metrics,
        Self::Sales,
        Self::CustomMetrics,
    ];

    /// Key used in config files
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Goals => "goals",
            Self::Milestones => "milestones",
            Self::Documents => "documents",
            Self::Feedback => "feedback",
            Self::Metrics => "metrics",
            Self::Sales => "sales",
            Self::CustomMetrics => "customMetrics",
        }
    }
}

/// Notion database ids; the key set is closed, every entry optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotionDatabases {
    #[serde(default)]
    pub tasks: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub milestones: Option<String>,
    #[serde(default)]
    pub documents: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub metrics: Option<String>,
    #[serde(default)]
    pub sales: Option<String>,
    #[serde(default)]
    pub custom_metrics: Option<String>,
}

impl NotionDatabases {
    /// Database id for a category, if configured
    #[must_use]
    pub fn get(&self, category: NotionCategory) -> Option<&str> {
        let id = match category {
            NotionCategory::Tasks => &self.tasks,
            NotionCategory::Goals => &self.goals,
            NotionCategory::Milestones => &self.milestones,
            NotionCategory::Documents => &self.documents,
            NotionCategory::Feedback => &self.feedback,
            NotionCategory::Metrics => &self.metrics,
            NotionCategory::Sales => &self.sales,
            NotionCategory::CustomMetrics => &self.custom_metrics,
        };
        id.as_deref()
    }

    /// Configured `(category, id)` pairs
    pub fn configured(&self) -> impl Iterator<Item = (NotionCategory, &str)> {
        NotionCategory::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|id| (c, id)))
    }
}

/// Named external link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub name: String,
    pub url: String,
}

/// One weekly report entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
}
