//! Spotify Top Tracks Playlist Library
//!
//! A small web application that logs a user in with Spotify and keeps a
//! playlist of their most played tracks. The playlist is recognised by a
//! marker in its name (`TOP30` by default) and is created on first visit.
//!
//! # Modules
//!
//! - `api` - HTTP handlers
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `logging` - Tracing subscriber setup
//! - `management` - Token cache and playlist reconciliation
//! - `server` - Router, shared state and HTTP server
//! - `spotify` - Spotify Web API and accounts service clients
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and formatting
//! - `views` - HTML pages
//!
//! # Example
//!
//! ```
//! use sportop::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sportop::Result<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let state = std::sync::Arc::new(server::AppState::new(config));
//!     server::start_api_server(state).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod views;

pub use error::{Error, Result};

/// Prints a status line with a blue bullet point.
///
/// Console output of the CLI, request logging goes through `tracing`.
///
/// ```
/// info!("Serving on {}", base_url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red exclamation mark and exits with code 1.
///
/// Only for failures the CLI cannot continue from. Evaluates to `!`, so it
/// can stand in any match arm.
///
/// ```
/// let config = match Config::from_env() {
///     Ok(config) => config,
///     Err(e) => error!("Cannot load configuration. Err: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
