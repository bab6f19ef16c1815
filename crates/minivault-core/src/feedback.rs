//! Feedback persistence
//!
//! Each accepted submission becomes one plain-text file:
//!
//! ```text
//! <data_dir>/feedbacks/<YYYY-MM-DD>_<sanitized title, max 50 chars>.txt
//! ```
//!
//! Files are never edited in place. Two submissions with the same title and
//! date derive the same filename; the later write replaces the earlier one.

use crate::error::FeedbackError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest sanitized title kept in a filename
pub const MAX_TITLE_CHARS: usize = 50;

/// Subdirectory of the data directory holding feedback files
pub const FEEDBACK_SUBDIR: &str = "feedbacks";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw submission as received from the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl FeedbackSubmission {
    /// Validate into a record; an absent or empty date becomes `today`
    pub fn validate(self, today: NaiveDate) -> Result<FeedbackRecord, FeedbackError> {
        fn required(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        let title = required(self.title);
        let feedback = required(self.feedback);
        let user_name = required(self.user_name);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if feedback.is_none() {
            missing.push("feedback");
        }
        if user_name.is_none() {
            missing.push("userName");
        }

        let (Some(title), Some(feedback), Some(user_name)) = (title, feedback, user_name) else {
            return Err(FeedbackError::MissingFields(missing));
        };

        let date = match required(self.date) {
            Some(raw) => parse_date(&raw).ok_or(FeedbackError::InvalidDate(raw))?,
            None => today,
        };

        Ok(FeedbackRecord {
            title,
            date,
            feedback,
            user_name,
        })
    }
}

/// Accepts a zero-padded `YYYY-MM-DD` date or an RFC 3339 timestamp (its
/// calendar date in the timestamp's own offset). Anything else, including
/// unpadded dates such as `2025-1-1`, is rejected.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    let padded = raw.len() == 10 && raw.as_bytes()[4] == b'-' && raw.as_bytes()[7] == b'-';
    if !padded {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Validated feedback record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub title: String,
    pub date: NaiveDate,
    pub feedback: String,
    pub user_name: String,
}

impl FeedbackRecord {
    /// Filename this record is stored under
    #[must_use]
    pub fn filename(&self) -> String {
        derive_filename(&self.title, self.date)
    }

    /// File body, stamped with the creation time
    #[must_use]
    pub fn render(&self, created_at: DateTime<Utc>) -> String {
        format!(
            "Title: {title}\nDate: {date}\nUser: {user}\n\nFeedback:\n{feedback}\n\n---\nCreated: {created}\n",
            title = self.title,
            date = self.date.format(DATE_FORMAT),
            user = self.user_name,
            feedback = self.feedback,
            created = created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}

/// Lower-case the title, map everything outside `[a-z0-9]` to `_`, keep at
/// most [`MAX_TITLE_CHARS`] characters
///
/// Replacement is per UTF-16 code unit, so a character outside the Basic
/// Multilingual Plane (most emoji) becomes `__`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len().min(MAX_TITLE_CHARS));
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else {
            out.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    out.truncate(MAX_TITLE_CHARS);
    out
}

/// `<YYYY-MM-DD>_<sanitized title>.txt`
#[must_use]
pub fn derive_filename(title: &str, date: NaiveDate) -> String {
    format!("{}_{}.txt", date.format(DATE_FORMAT), sanitize_title(title))
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFeedback {
    pub filename: String,
    pub path: PathBuf,
}

/// Flat-file feedback store rooted at `<data_dir>/feedbacks`
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    dir: PathBuf,
}

impl FeedbackStore {
    /// Store under `<data_dir>/feedbacks`
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(FEEDBACK_SUBDIR),
        }
    }

    /// Directory feedback files are written to
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory and its parents; no-op if present
    pub async fn ensure_dir(&self) -> Result<(), FeedbackError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FeedbackError::io_error(&self.dir, e))
    }

    /// Persist a record stamped with the current time
    pub async fn save(&self, record: &FeedbackRecord) -> Result<SavedFeedback, FeedbackError> {
        self.save_at(record, Utc::now()).await
    }

    /// Persist a record stamped with `created_at`, replacing any file of
    /// the same name
    pub async fn save_at(
        &self,
        record: &FeedbackRecord,
        created_at: DateTime<Utc>,
    ) -> Result<SavedFeedback, FeedbackError> {
        self.ensure_dir().await?;

        let filename = record.filename();
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, record.render(created_at))
            .await
            .map_err(|e| FeedbackError::io_error(&path, e))?;

        tracing::info!(filename = %filename, user = %record.user_name, "feedback saved");
        Ok(SavedFeedback { filename, path })
    }
}
