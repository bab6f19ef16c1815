//! MiniVault Notion
//!
//! Minimal Notion REST client backing the proxy routes: query one
//! database, create one page. Responses come back as raw JSON plus the
//! upstream status so callers can relay them untouched.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod error;
pub mod schema;

// Re-exports for convenience
pub use client::{NotionClient, UpstreamResponse, DEFAULT_BASE_URL, NOTION_VERSION};
pub use error::NotionError;
pub use schema::TestTask;
