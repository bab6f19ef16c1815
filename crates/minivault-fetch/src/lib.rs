//! MiniVault Fetch
//!
//! The data-fetch cache every dashboard section reads through.
//!
//! # Architecture
//!
//! ```text
//! Section ──get(key)──→ FetchCache ──miss──→ Fetcher (HttpFetcher: GET + JSON)
//!                          │   ↑                 │
//!                          │   └── retry ×2, 5s ─┘
//!                          └── moka (TTL = dedupe window, in-flight coalescing)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use minivault_fetch::{FetchCache, HttpFetcher};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = FetchCache::new(Arc::new(HttpFetcher::new("http://127.0.0.1:3000")));
//! let tasks = cache.get("/api/notion/debug").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;

// Re-exports for convenience
pub use cache::{CacheEntry, CacheStats, FetchCache};
pub use config::FetchConfig;
pub use error::FetchError;
pub use fetcher::{Fetcher, HttpFetcher};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
