//! The in-memory patient index and the operations that keep it in step
//! with the backing CSV files.
//!
//! Data flows one way per operation: CSV → memory on `load`, memory → CSV
//! on `add_visit` and `remove_patient`. There is no transaction around the
//! pair. If a write fails after memory has changed, the two stay diverged
//! until the next load.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use wardbook_contracts::{
    error::{WardError, WardResult},
    record::{Demographics, Department, Note, NoteMatching, Patient, Visit, VisitId},
};

use crate::{
    csv_io::{self, NoteRow, Source, VisitRow},
    date::{normalize_date, parse_date},
};

/// Authoritative in-memory mirror of the patient and notes files.
///
/// Patients and departments are index tables keyed by id and name. A
/// department records patient ids, never patient values, so there are no
/// ownership cycles between the two.
#[derive(Debug, Clone)]
pub struct RecordStore {
    patient_path: PathBuf,
    note_path: Option<PathBuf>,
    note_matching: NoteMatching,
    patients: BTreeMap<String, Patient>,
    departments: BTreeMap<String, Department>,
}

impl RecordStore {
    /// An empty store whose mutations persist to `patient_path`.
    pub fn new(patient_path: impl Into<PathBuf>) -> Self {
        Self {
            patient_path: patient_path.into(),
            note_path: None,
            note_matching: NoteMatching::default(),
            patients: BTreeMap::new(),
            departments: BTreeMap::new(),
        }
    }

    /// Build the index from the patient file and the notes file.
    ///
    /// Either file may be missing; that is logged and the store carries on
    /// with nothing from that source. Rows with an unparseable age or visit
    /// date, or with no patient id, are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `ReadFailed` if a file exists but cannot be opened or read.
    pub fn load(patient_path: impl Into<PathBuf>, note_path: impl Into<PathBuf>) -> WardResult<Self> {
        let mut store = Self::new(patient_path);
        let note_path = note_path.into();

        let patient_path = store.patient_path.clone();
        store.load_visits(&patient_path)?;
        store.load_notes(&note_path)?;
        store.note_path = Some(note_path);

        info!(
            patients = store.patients.len(),
            departments = store.departments.len(),
            "records loaded"
        );
        Ok(store)
    }

    /// Choose how `view_note` associates notes with a date.
    pub fn with_note_matching(mut self, note_matching: NoteMatching) -> Self {
        self.note_matching = note_matching;
        self
    }

    pub fn patient_path(&self) -> &Path {
        &self.patient_path
    }

    pub fn note_path(&self) -> Option<&Path> {
        self.note_path.as_deref()
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    fn load_visits(&mut self, path: &Path) -> WardResult<()> {
        let mut reader = match csv_io::open_source(path)? {
            Source::Present(reader) => reader,
            Source::Missing => {
                warn!(path = %path.display(), "patient data file not found; starting empty");
                return Ok(());
            }
        };

        for (idx, row) in reader.deserialize::<VisitRow>().enumerate() {
            // Row 1 is the header.
            let line = idx + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(csv_io::read_failed(path, e));
                }
                Err(e) => {
                    warn!(path = %path.display(), line, error = %e, "skipping malformed visit row");
                    continue;
                }
            };

            if row.patient_id.is_empty() {
                warn!(path = %path.display(), line, "skipping visit row without a patient id");
                continue;
            }
            let Ok(age) = row.age.parse::<u32>() else {
                warn!(
                    path = %path.display(),
                    line,
                    patient_id = %row.patient_id,
                    age = %row.age,
                    "skipping visit row with invalid age"
                );
                continue;
            };
            let Some(date) = parse_date(&row.visit_time) else {
                warn!(
                    path = %path.display(),
                    line,
                    patient_id = %row.patient_id,
                    visit_time = %row.visit_time,
                    "skipping visit row with unknown date format"
                );
                continue;
            };

            let visit = Visit {
                id: VisitId(row.visit_id),
                time: date.format(crate::date::ISO_FORMAT).to_string(),
                department: row.department,
                demographics: Demographics {
                    gender: row.gender,
                    race: row.race,
                    age,
                    ethnicity: row.ethnicity,
                    insurance: row.insurance,
                    zip_code: row.zip_code,
                    chief_complaint: row.chief_complaint,
                },
            };
            self.index_visit(&row.patient_id, visit);
        }
        Ok(())
    }

    fn load_notes(&mut self, path: &Path) -> WardResult<()> {
        let mut reader = match csv_io::open_source(path)? {
            Source::Present(reader) => reader,
            Source::Missing => {
                warn!(path = %path.display(), "notes file not found; no notes loaded");
                return Ok(());
            }
        };

        for (idx, row) in reader.deserialize::<NoteRow>().enumerate() {
            let line = idx + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(csv_io::read_failed(path, e));
                }
                Err(e) => {
                    warn!(path = %path.display(), line, error = %e, "skipping malformed note row");
                    continue;
                }
            };
            if row.patient_id.is_empty() {
                warn!(path = %path.display(), line, "skipping note row without a patient id");
                continue;
            }

            self.patients
                .entry(row.patient_id.clone())
                .or_insert_with(|| Patient::new(row.patient_id.clone()))
                .add_note(Note {
                    id: row.note_id,
                    visit_id: row.visit_id,
                    text: row.text,
                });
        }
        Ok(())
    }

    fn index_visit(&mut self, patient_id: &str, visit: Visit) {
        self.departments
            .entry(visit.department.clone())
            .or_insert_with(|| Department::new(visit.department.clone()))
            .add_patient(patient_id);
        self.patients
            .entry(patient_id.to_string())
            .or_insert_with(|| Patient::new(patient_id))
            .add_visit(visit);
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Record a new visit and append it to the patient file.
    ///
    /// The date is normalized and a fresh random visit id is generated. The
    /// patient and department are created if absent.
    ///
    /// # Errors
    ///
    /// - `InvalidField` for an empty patient id or department, or a date in
    ///   none of the accepted formats. Nothing is changed.
    /// - `WriteFailed` if the append fails. The visit is already in memory
    ///   at that point and stays there.
    pub fn add_visit(
        &mut self,
        patient_id: &str,
        visit_time: &str,
        department: &str,
        demographics: Demographics,
    ) -> WardResult<VisitId> {
        let patient_id = patient_id.trim();
        let department = department.trim();

        if patient_id.is_empty() {
            return Err(invalid("patient_id", patient_id));
        }
        if department.is_empty() {
            return Err(invalid("department", department));
        }
        let time = normalize_date(visit_time);
        if parse_date(&time).is_none() {
            return Err(invalid("visit_time", visit_time));
        }

        let visit = Visit {
            id: VisitId::generate(),
            time,
            department: department.to_string(),
            demographics,
        };
        let id = visit.id.clone();
        let row = VisitRow::new(patient_id, &visit);
        self.index_visit(patient_id, visit);
        csv_io::append_visit_row(&self.patient_path, &row)?;

        info!(patient_id = %patient_id, visit_id = %id, department = %department, "visit added");
        Ok(id)
    }

    /// Remove a patient from memory and every one of their rows from the
    /// patient file.
    ///
    /// The file is rewritten even if the patient is not in memory, so rows
    /// that were skipped at load time are purged too. Notes on disk and
    /// department membership are left as they are.
    ///
    /// The file is rewritten first; the in-memory patient is dropped only
    /// once the rewrite has succeeded, so a failed rewrite changes nothing.
    ///
    /// Returns true if anything was removed from memory or disk.
    pub fn remove_patient(&mut self, patient_id: &str) -> WardResult<bool> {
        let patient_id = patient_id.trim();
        let dropped = csv_io::rewrite_without_patient(&self.patient_path, patient_id)?;
        let in_memory = self.patients.remove(patient_id).is_some();

        info!(patient_id = %patient_id, in_memory, rows_dropped = dropped, "patient removed");
        Ok(in_memory || dropped > 0)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn patient(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.get(patient_id.trim())
    }

    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.get(name)
    }

    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.values()
    }

    /// Every visit of every patient, patients in id order.
    pub fn visits(&self) -> impl Iterator<Item = &Visit> {
        self.patients.values().flat_map(|p| p.visits.iter())
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// See [`Patient::most_recent_visit`] for tie handling.
    pub fn most_recent_visit(&self, patient_id: &str) -> Option<&Visit> {
        self.patient(patient_id)?.most_recent_visit()
    }

    /// A text dump of the patient's visits, one per line.
    ///
    /// Falls back to the patient's notes when there are no visits. Returns
    /// `None` for an unknown patient.
    pub fn retrieve_patient(&self, patient_id: &str) -> Option<String> {
        let patient = self.patient(patient_id)?;
        let lines: Vec<String> = if patient.visits.is_empty() {
            patient.notes.iter().map(ToString::to_string).collect()
        } else {
            patient.visits.iter().map(ToString::to_string).collect()
        };
        Some(lines.join("\n"))
    }

    /// Write the `retrieve_patient` dump to `path`, under a `Patient ID:`
    /// line. Returns false (and writes nothing) for an unknown patient.
    pub fn export_patient(&self, patient_id: &str, path: &Path) -> WardResult<bool> {
        let Some(dump) = self.retrieve_patient(patient_id) else {
            return Ok(false);
        };
        let contents = format!("Patient ID: {}\n{}\n", patient_id.trim(), dump);
        std::fs::write(path, contents).map_err(|e| WardError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(patient_id = %patient_id, path = %path.display(), "patient exported");
        Ok(true)
    }

    /// The text of every note tied to the patient's visits on `date`.
    ///
    /// `date` is normalized first and then used as a prefix, so a full date
    /// selects one day and e.g. `2024-05` selects a month. With
    /// `NoteMatching::ExactVisit` a note qualifies when its visit id names
    /// one of the matching visits; with `NoteMatching::VisitIdPrefix` when
    /// the note's visit id itself starts with the date. Texts are joined by
    /// a blank line. Returns `None` for an unknown patient, an empty date,
    /// or no matching note.
    pub fn view_note(&self, patient_id: &str, date: &str) -> Option<String> {
        let patient = self.patient(patient_id)?;
        let prefix = normalize_date(date.trim());
        if prefix.is_empty() {
            return None;
        }

        let texts: Vec<&str> = match self.note_matching {
            NoteMatching::ExactVisit => {
                let visit_ids: HashSet<&str> = patient
                    .visits
                    .iter()
                    .filter(|v| v.time.starts_with(&prefix))
                    .map(|v| v.id.as_str())
                    .collect();
                patient
                    .notes
                    .iter()
                    .filter(|n| visit_ids.contains(n.visit_id.as_str()))
                    .map(|n| n.text.as_str())
                    .collect()
            }
            NoteMatching::VisitIdPrefix => patient
                .notes
                .iter()
                .filter(|n| n.visit_id.starts_with(&prefix))
                .map(|n| n.text.as_str())
                .collect(),
        };

        (!texts.is_empty()).then(|| texts.join("\n\n"))
    }

    /// Number of visits, across all patients, on `date` (normalized).
    pub fn count_visits_on(&self, date: &str) -> usize {
        let target = normalize_date(date.trim());
        self.visits().filter(|v| v.date() == target).count()
    }
}

fn invalid(field: &str, value: &str) -> WardError {
    WardError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}
