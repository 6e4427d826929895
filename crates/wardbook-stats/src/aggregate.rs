//! Visit tallies.
//!
//! Aggregation is a pure function of the visits it is given: one pass, six
//! tallies, no I/O. Rendering lives in `chart`.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use wardbook_contracts::record::Visit;
use wardbook_records::{parse_date, RecordStore};

/// Age groups used in reporting.
///
/// Boundaries belong to the older bracket: 18 is an adult, 65 a senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeBracket {
    Child,
    Adult,
    Senior,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 3] = [AgeBracket::Child, AgeBracket::Adult, AgeBracket::Senior];

    pub fn classify(age: u32) -> Self {
        match age {
            0..=17 => AgeBracket::Child,
            18..=64 => AgeBracket::Adult,
            _ => AgeBracket::Senior,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::Child => "Child",
            AgeBracket::Adult => "Adult",
            AgeBracket::Senior => "Senior",
        }
    }
}

/// Visit counts keyed six ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitStatistics {
    /// Keyed by the visit's calendar date (`YYYY-MM-DD`).
    pub by_date: BTreeMap<String, usize>,
    pub by_insurance: BTreeMap<String, usize>,
    pub by_gender: BTreeMap<String, usize>,
    pub by_department: BTreeMap<String, usize>,
    /// Always holds all three brackets, zero or not.
    pub by_age_bracket: BTreeMap<AgeBracket, usize>,
    /// Keyed by the lower-cased chief complaint.
    pub by_complaint: BTreeMap<String, usize>,
}

impl Default for VisitStatistics {
    fn default() -> Self {
        Self {
            by_date: BTreeMap::new(),
            by_insurance: BTreeMap::new(),
            by_gender: BTreeMap::new(),
            by_department: BTreeMap::new(),
            by_age_bracket: AgeBracket::ALL.into_iter().map(|b| (b, 0)).collect(),
            by_complaint: BTreeMap::new(),
        }
    }
}

impl VisitStatistics {
    pub fn from_visits<'a>(visits: impl IntoIterator<Item = &'a Visit>) -> Self {
        let mut stats = Self::default();
        for visit in visits {
            let d = &visit.demographics;
            bump(&mut stats.by_date, visit.date());
            bump(&mut stats.by_insurance, &d.insurance);
            bump(&mut stats.by_gender, &d.gender);
            bump(&mut stats.by_department, &visit.department);
            bump(&mut stats.by_complaint, &d.chief_complaint.to_lowercase());
            *stats.by_age_bracket.entry(AgeBracket::classify(d.age)).or_insert(0) += 1;
        }
        stats
    }

    /// Tally every visit in the store.
    pub fn from_store(store: &RecordStore) -> Self {
        Self::from_visits(store.visits())
    }

    pub fn total_visits(&self) -> usize {
        self.by_date.values().sum()
    }

    /// Restrict the date tally to the trailing `days`-day window ending at
    /// `now`.
    ///
    /// A date is kept when its midnight is at or after `now - days`, so a
    /// one-day window taken mid-afternoon keeps only today. Dates that do
    /// not parse are dropped. The other tallies are left untouched.
    ///
    /// `days == 0` means no window. A window reaching past the earliest
    /// representable date also keeps every entry.
    pub fn retain_last_days(&mut self, days: u32, now: NaiveDateTime) {
        if days == 0 {
            return;
        }
        let Some(cutoff) = Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))
        else {
            debug!(days, "window exceeds the calendar; keeping every date");
            return;
        };
        self.by_date.retain(|date, _| {
            parse_date(date)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .is_some_and(|midnight| midnight >= cutoff)
        });
    }

    /// The `n` most frequent complaints, most frequent first; ties in
    /// alphabetical order.
    pub fn top_complaints(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.by_complaint.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

fn bump(tally: &mut BTreeMap<String, usize>, key: &str) {
    *tally.entry(key.to_string()).or_insert(0) += 1;
}
