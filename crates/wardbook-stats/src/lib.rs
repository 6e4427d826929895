//! # wardbook-stats
//!
//! Visit statistics for the wardbook record store.
//!
//! [`VisitStatistics`] tallies visits by date, insurance, gender, department,
//! age bracket and complaint. [`render_chart`] draws four of those tallies as
//! a single SVG image.
//!
//! ```rust,ignore
//! let mut stats = VisitStatistics::from_store(&store);
//! stats.retain_last_days(30, chrono::Local::now().naive_local());
//! render_chart(&stats, Path::new("output/visit_stats.svg"))?;
//! ```

pub mod aggregate;
pub mod chart;

pub use aggregate::{AgeBracket, VisitStatistics};
pub use chart::{render_chart, CHART_TITLE};

// ── Tests ─────────────────────────────────────────────────────────────────────
