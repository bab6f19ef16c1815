//! Page property payloads

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

/// Fixed-schema record created by the create-test route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTask {
    pub title: String,
    pub status: String,
    pub due: NaiveDate,
    pub priority: String,
    pub tags: Vec<String>,
}

impl TestTask {
    /// Canonical test task due one week after `today`
    #[must_use]
    pub fn sample(today: NaiveDate) -> Self {
        Self {
            title: "Test Task from MiniVault".to_string(),
            status: "Not Started".to_string(),
            due: today + Duration::days(7),
            priority: "Medium".to_string(),
            tags: vec!["Test".to_string(), "API".to_string()],
        }
    }

    /// Notion `properties` object
    #[must_use]
    pub fn to_properties(&self) -> Value {
        let tags: Vec<Value> = self.tags.iter().map(|t| json!({ "name": t })).collect();
        json!({
            "Name": { "title": [{ "text": { "content": self.title } }] },
            "Status": { "select": { "name": self.status } },
            "Due Date": { "date": { "start": self.due.format("%Y-%m-%d").to_string() } },
            "Priority": { "select": { "name": self.priority } },
            "Tags": { "multi_select": tags },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_properties_shape() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let props = TestTask::sample(today).to_properties();

        assert_eq!(
            props["Name"]["title"][0]["text"]["content"],
            "Test Task from MiniVault"
        );
        assert_eq!(props["Status"]["select"]["name"], "Not Started");
        assert_eq!(props["Due Date"]["date"]["start"], "2025-01-08");
        assert_eq!(props["Priority"]["select"]["name"], "Medium");
        assert_eq!(
            props["Tags"]["multi_select"],
            json!([{ "name": "Test" }, { "name": "API" }])
        );
    }
}
