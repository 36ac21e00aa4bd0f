//! CLI module for the metad binary

#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;

#[cfg(feature = "cli")]
pub use error::CliError;
