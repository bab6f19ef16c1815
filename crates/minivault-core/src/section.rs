//! Section registry
//!
//! The dashboard is a fixed set of sections, each mounted behind the
//! session gate on its own route and reading its data through the shared
//! fetch cache.

use crate::config::NotionCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named, independently routable dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Overview,
    Orders,
    Goals,
    Sales,
    Analytics,
    Tasks,
    Feedback,
    Reports,
    Guides,
    Metrics,
}

impl Section {
    /// Every section in navigation order
    pub const ALL: [Section; 10] = [
        Self::Overview,
        Self::Orders,
        Self::Goals,
        Self::Sales,
        Self::Analytics,
        Self::Tasks,
        Self::Feedback,
        Self::Reports,
        Self::Guides,
        Self::Metrics,
    ];

    /// Stable slug
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Orders => "orders",
            Self::Goals => "goals",
            Self::Sales => "sales",
            Self::Analytics => "analytics",
            Self::Tasks => "tasks",
            Self::Feedback => "feedback",
            Self::Reports => "reports",
            Self::Guides => "guides",
            Self::Metrics => "metrics",
        }
    }

    /// Route the section is mounted on; the overview owns `/`
    #[must_use]
    pub fn route(self) -> String {
        match self {
            Self::Overview => "/".to_string(),
            other => format!("/{}", other.slug()),
        }
    }

    /// Human-readable title
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Orders => "Orders",
            Self::Goals => "Goals",
            Self::Sales => "Sales",
            Self::Analytics => "Analytics",
            Self::Tasks => "Tasks",
            Self::Feedback => "Feedback",
            Self::Reports => "Weekly Reports",
            Self::Guides => "Guides",
            Self::Metrics => "Metrics",
        }
    }

    /// Notion database category backing this section, if any
    #[must_use]
    pub fn notion_category(self) -> Option<NotionCategory> {
        match self {
            Self::Goals => Some(NotionCategory::Goals),
            Self::Sales | Self::Orders => Some(NotionCategory::Sales),
            Self::Tasks => Some(NotionCategory::Tasks),
            Self::Feedback => Some(NotionCategory::Feedback),
            Self::Metrics => Some(NotionCategory::Metrics),
            Self::Analytics => Some(NotionCategory::CustomMetrics),
            Self::Guides => Some(NotionCategory::Documents),
            Self::Overview | Self::Reports => None,
        }
    }

    /// Resource identifiers the section reads through the fetch cache
    #[must_use]
    pub fn resources(self) -> &'static [&'static str] {
        match self {
            Self::Tasks | Self::Goals | Self::Metrics | Self::Analytics => {
                &["/api/notion/debug"]
            }
            Self::Overview => &["/api/health"],
            _ => &[],
        }
    }

    /// Look up the section mounted on `route`
    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        let slug = route.trim_matches('/');
        if slug.is_empty() {
            return Some(Self::Overview);
        }
        slug.parse().ok()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Unknown section slug
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.slug() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
