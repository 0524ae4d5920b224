//! # potion-cli — UI Potion Command-Line Interface
//!
//! Build-time and interactive validation of potion documents.
//!
//! ## Subcommands
//!
//! - `validate`: validate every potion under the potions directory against
//!   its category schema; exits non-zero if any fails or none are found.
//! - `check`: validate one document (file or stdin) against a local schema
//!   tree or a deployed site's schemas.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to `potion-schema`; no schema logic here.
//! - The report goes to stdout; logs go to stderr.

pub mod check;
pub mod config;
pub mod discover;
pub mod report;
pub mod validate;
