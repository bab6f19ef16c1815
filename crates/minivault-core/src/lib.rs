//! MiniVault Core
//!
//! Domain layer of the MiniVault dashboard:
//! - Session state and the gate protecting every section
//! - The fixed section registry
//! - Per-deployment project configuration
//! - Feedback validation and flat-file persistence
//!
//! # Architecture
//!
//! ```text
//! navigation → SessionGate ──Content──→ Section ──reads──→ FetchCache (minivault-fetch)
//!                  │
//!                  └──Absent──→ Navigator("/auth/signin")
//!
//! form submit → FeedbackSubmission::validate → FeedbackStore::save → data/feedbacks/*.txt
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use minivault_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FeedbackStore::new("data");
//! store.ensure_dir().await?;
//!
//! let record = submission.validate(chrono::Utc::now().date_naive())?;
//! let saved = store.save(&record).await?;
//! println!("wrote {}", saved.path.display());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod feedback;
pub mod gate;
pub mod section;
pub mod session;

// Re-exports for convenience
pub use config::{
    CustomLink, DriveFolder, GithubRepo, NotionCategory, NotionDatabases, ProjectConfig,
    WeeklyReport,
};
pub use error::{ConfigError, FeedbackError};
pub use feedback::{
    derive_filename, sanitize_title, FeedbackRecord, FeedbackStore, FeedbackSubmission,
    SavedFeedback,
};
pub use gate::{GateView, Navigator, SessionGate, SIGN_IN_ROUTE};
pub use section::{Section, UnknownSection};
pub use session::{SessionHandle, SessionRegistry, SessionResolver, SessionState, User};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with MiniVault core
    pub use crate::{
        FeedbackStore, FeedbackSubmission, GateView, Navigator, ProjectConfig, Section,
        SessionGate, SessionResolver, SessionState, User,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
