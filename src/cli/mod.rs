//! # CLI Module
//!
//! Command implementations behind the `sportop` binary. Argument parsing
//! lives in `main.rs`, the commands here report progress with the console
//! macros ([`crate::info!`], [`crate::warning!`], [`crate::error!`]).
//!
//! ```bash
//! sportop serve                     # serve on SERVER_ADDRESS
//! sportop serve --open              # and log in through the browser
//! sportop completions zsh           # shell completions
//! ```

mod serve;

pub use serve::serve;
