//! MiniVault Server
//!
//! HTTP surface of the dashboard, built on warp:
//! - Session-gated section pages and the sign-in page
//! - Notion proxy routes (`/api/notion/*`)
//! - Feedback persistence (`/api/feedback/save`)
//! - Session token binding for the identity provider (`/api/auth/session`)
//!
//! # Example
//!
//! ```rust,ignore
//! use minivault_server::{serve, AppState, Secrets, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::new(Secrets::from_env());
//! let state = AppState::from_config(&config).await?;
//! serve(state, config.bind).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod dev;
pub mod error;
mod render;
mod reply;
pub mod routes;
pub mod settings;
pub mod state;

// Re-exports for convenience
pub use dev::DevSession;
pub use error::StartupError;
pub use routes::{routes, SESSION_COOKIE};
pub use settings::{AuthProvider, Secrets, ServerConfig};
pub use state::AppState;

use std::net::SocketAddr;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serve every route on `addr` until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), warp::Error> {
    let project = state.project.name.clone();
    let (bound, server) =
        warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown requested");
        })?;

    tracing::info!(addr = %bound, project = %project, "MiniVault listening");
    server.await;
    Ok(())
}
