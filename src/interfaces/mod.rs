//! User-facing interfaces

#[cfg(feature = "cli")]
pub mod cli;
