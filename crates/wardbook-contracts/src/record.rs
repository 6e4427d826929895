//! Patient, visit, note, and department records.
//!
//! These are plain data holders. Relationships are expressed through keys
//! (patient id, department name) rather than shared references: a `Visit`
//! names its department, and a `Department` holds the ids of its patients.
//! The repository owns the index tables that resolve those keys.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Identifier of a single visit.
///
/// Ids loaded from CSV are kept verbatim; ids for new visits come from
/// [`VisitId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitId(pub String);

impl VisitId {
    /// Create a fresh random (UUID v4) visit id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Demographic and intake fields recorded with every visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub gender: String,
    pub race: String,
    pub age: u32,
    pub ethnicity: String,
    pub insurance: String,
    pub zip_code: String,
    pub chief_complaint: String,
}

/// One recorded encounter between a patient and a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    /// Normalized (`YYYY-MM-DD`) visit date.
    pub time: String,
    /// Name of the department; key into the department index.
    pub department: String,
    pub demographics: Demographics,
}

impl Visit {
    /// The calendar-date part of `time`, or all of `time` when it is shorter
    /// than a date.
    pub fn date(&self) -> &str {
        self.time.get(..10).unwrap_or(&self.time)
    }
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.demographics;
        write!(
            f,
            "Visit ID: {}, Date: {}, Department: {}, Gender: {}, Race: {}, Age: {}, \
             Ethnicity: {}, Insurance: {}, Zip: {}, Complaint: {}",
            self.id,
            self.time,
            self.department,
            d.gender,
            d.race,
            d.age,
            d.ethnicity,
            d.insurance,
            d.zip_code,
            d.chief_complaint
        )
    }
}

/// A free-text clinical note.
///
/// `visit_id` is a loose foreign key: it is never checked against the
/// patient's visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub visit_id: String,
    pub text: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}

/// A patient and everything recorded against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    /// Visits in insertion order (not chronological).
    pub visits: Vec<Visit>,
    /// Notes in insertion order.
    pub notes: Vec<Note>,
}

impl Patient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visits: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn add_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// The visit with the greatest timestamp.
    ///
    /// Scans all visits; storage order is irrelevant. When several visits
    /// share the greatest timestamp, the last inserted of them is returned.
    pub fn most_recent_visit(&self) -> Option<&Visit> {
        self.visits.iter().max_by(|a, b| a.time.cmp(&b.time))
    }
}

/// A named grouping of the patients seen by one department.
///
/// Membership only grows: removing a visit or patient elsewhere does not
/// retract it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub patients: BTreeSet<String>,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patients: BTreeSet::new(),
        }
    }

    /// Record that `patient_id` has been seen here. Duplicates are ignored.
    pub fn add_patient(&mut self, patient_id: impl Into<String>) {
        self.patients.insert(patient_id.into());
    }

    pub fn has_patient(&self, patient_id: &str) -> bool {
        self.patients.contains(patient_id)
    }
}

/// How `view_note` ties a note to the visits on a given date.
///
/// The two rules are not equivalent: exact matching looks up the patient's
/// visits on that date and returns notes whose `visit_id` names one of them;
/// prefix matching treats the note's `visit_id` itself as date-prefixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteMatching {
    #[default]
    ExactVisit,
    VisitIdPrefix,
}
