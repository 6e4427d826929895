//! # wardbook-core
//!
//! The session layer of wardbook.
//!
//! This crate provides:
//! - The seam traits (`AccessPolicy`, `Authenticator`, `UsageLog`)
//! - The `Session` that gates every user action on the role table and
//!   records it in the usage log
//! - `AppConfig`, the TOML configuration for file locations and options
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wardbook_core::{Session, traits::{AccessPolicy, UsageLog}};
//!
//! let session = Session::login(&credentials, "nurse1", "pw", Box::new(policy), Box::new(log))?;
//! let n = session.perform(Action::CountVisits, || Ok(store.count_visits_on("2024-05-18")))?;
//! ```

pub mod config;
pub mod session;
pub mod traits;

pub use config::AppConfig;
pub use session::Session;

// ── Tests ─────────────────────────────────────────────────────────────────────
