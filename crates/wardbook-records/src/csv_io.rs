//! Row schemas and file primitives for the patient and notes CSV files.
//!
//! Reads deserialize by header name, so column order in the source file
//! does not matter and extra columns are ignored. Appends follow the
//! existing file's header order. Rewrites go through a sibling temporary
//! file that replaces the original with a single rename.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Deserialize;
use tracing::debug;

use wardbook_contracts::{
    error::{WardError, WardResult},
    record::Visit,
};

/// Header of the patient/visit file, one visit per row.
pub const PATIENT_HEADER: [&str; 11] = [
    "Patient_ID",
    "Visit_ID",
    "Visit_time",
    "Visit_department",
    "Gender",
    "Race",
    "Age",
    "Ethnicity",
    "Insurance",
    "Zip_code",
    "Chief_complaint",
];

/// Name of the patient-id column in both files.
pub const PATIENT_ID_COLUMN: &str = "Patient_ID";

/// One raw row of the patient file.
///
/// Every field is kept as text; the repository decides what a malformed
/// age or date means.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VisitRow {
    #[serde(rename = "Patient_ID")]
    pub patient_id: String,
    #[serde(rename = "Visit_ID")]
    pub visit_id: String,
    #[serde(rename = "Visit_time")]
    pub visit_time: String,
    #[serde(rename = "Visit_department")]
    pub department: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Race")]
    pub race: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Ethnicity")]
    pub ethnicity: String,
    #[serde(rename = "Insurance")]
    pub insurance: String,
    #[serde(rename = "Zip_code")]
    pub zip_code: String,
    #[serde(rename = "Chief_complaint")]
    pub chief_complaint: String,
}

impl VisitRow {
    pub fn new(patient_id: &str, visit: &Visit) -> Self {
        let d = &visit.demographics;
        Self {
            patient_id: patient_id.to_string(),
            visit_id: visit.id.to_string(),
            visit_time: visit.time.clone(),
            department: visit.department.clone(),
            gender: d.gender.clone(),
            race: d.race.clone(),
            age: d.age.to_string(),
            ethnicity: d.ethnicity.clone(),
            insurance: d.insurance.clone(),
            zip_code: d.zip_code.clone(),
            chief_complaint: d.chief_complaint.clone(),
        }
    }

    /// Value of the named column, or `None` for a column this schema lacks.
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            "Patient_ID" => &self.patient_id,
            "Visit_ID" => &self.visit_id,
            "Visit_time" => &self.visit_time,
            "Visit_department" => &self.department,
            "Gender" => &self.gender,
            "Race" => &self.race,
            "Age" => &self.age,
            "Ethnicity" => &self.ethnicity,
            "Insurance" => &self.insurance,
            "Zip_code" => &self.zip_code,
            "Chief_complaint" => &self.chief_complaint,
            _ => return None,
        };
        Some(value)
    }
}

/// One raw row of the notes file.
///
/// Older exports name the body column `Note_type`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteRow {
    #[serde(rename = "Patient_ID")]
    pub patient_id: String,
    #[serde(rename = "Note_ID")]
    pub note_id: String,
    #[serde(rename = "Visit_ID")]
    pub visit_id: String,
    #[serde(rename = "Note_text", alias = "Note_type")]
    pub text: String,
}

/// Outcome of opening a source file for reading.
pub(crate) enum Source {
    Missing,
    Present(csv::Reader<File>),
}

/// Open `path` as a header-bearing CSV with every field trimmed.
pub(crate) fn open_source(path: &Path) -> WardResult<Source> {
    match ReaderBuilder::new().trim(Trim::All).from_path(path) {
        Ok(reader) => Ok(Source::Present(reader)),
        Err(e) if is_not_found(&e) => Ok(Source::Missing),
        Err(e) => Err(read_failed(path, e)),
    }
}

/// Append one visit row to the patient file.
///
/// A missing or empty file gets `PATIENT_HEADER` first. Otherwise values
/// are laid out in the existing header's order, with blanks for columns
/// this schema does not know. A final line without a trailing newline is
/// terminated before the new row is written.
pub fn append_visit_row(path: &Path, row: &VisitRow) -> WardResult<()> {
    let existing = existing_header(path)?;
    let write_header = existing.is_none();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| write_failed(path, e))?;

    let header: Vec<String> = match existing {
        Some(header) => {
            if !ends_with_newline(path).map_err(|e| write_failed(path, e))? {
                file.write_all(b"\n").map_err(|e| write_failed(path, e))?;
            }
            header.iter().map(str::to_string).collect()
        }
        None => PATIENT_HEADER.iter().map(|c| c.to_string()).collect(),
    };

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        writer.write_record(&header).map_err(|e| write_failed(path, e))?;
    }
    writer
        .write_record(header.iter().map(|col| row.field(col.trim()).unwrap_or("")))
        .map_err(|e| write_failed(path, e))?;
    writer.flush().map_err(|e| write_failed(path, e))?;

    debug!(path = %path.display(), patient_id = %row.patient_id, visit_id = %row.visit_id, "visit row appended");
    Ok(())
}

/// Rewrite `path` without any row whose `Patient_ID` equals `patient_id`.
///
/// Reads the whole file, filters it, writes the survivors (header first) to
/// a temporary sibling, and renames that over the original. Rows are copied
/// verbatim as raw bytes, including columns this crate does not model and
/// rows that are not valid UTF-8. Returns the number of rows dropped; a
/// missing file drops nothing.
pub fn rewrite_without_patient(path: &Path, patient_id: &str) -> WardResult<usize> {
    let mut reader = match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) if is_not_found(&e) => return Ok(0),
        Err(e) => return Err(read_failed(path, e)),
    };

    let header = reader.byte_headers().map_err(|e| read_failed(path, e))?.clone();
    let Some(column) = header
        .iter()
        .position(|h| h.trim_ascii() == PATIENT_ID_COLUMN.as_bytes())
    else {
        return Ok(0);
    };

    let mut kept: Vec<ByteRecord> = Vec::new();
    let mut dropped = 0;
    for record in reader.byte_records() {
        let record = record.map_err(|e| read_failed(path, e))?;
        if record.get(column).map(<[u8]>::trim_ascii) == Some(patient_id.as_bytes()) {
            dropped += 1;
        } else {
            kept.push(record);
        }
    }

    let tmp = temp_sibling(path);
    let written = write_all_records(&tmp, &header, &kept).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| write_failed(path, e))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written?;

    debug!(path = %path.display(), patient_id = %patient_id, dropped, "patient rows rewritten out");
    Ok(dropped)
}

fn write_all_records(path: &Path, header: &ByteRecord, records: &[ByteRecord]) -> WardResult<()> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| write_failed(path, e))?;
    writer.write_byte_record(header).map_err(|e| write_failed(path, e))?;
    for record in records {
        writer.write_byte_record(record).map_err(|e| write_failed(path, e))?;
    }
    writer.flush().map_err(|e| write_failed(path, e))?;
    Ok(())
}

/// The header row of an existing, non-empty file.
fn existing_header(path: &Path) -> WardResult<Option<StringRecord>> {
    let mut reader = match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) if is_not_found(&e) => return Ok(None),
        Err(e) => return Err(read_failed(path, e)),
    };
    let header = reader.headers().map_err(|e| read_failed(path, e))?;
    Ok((!header.is_empty()).then(|| header.clone()))
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound)
}

pub(crate) fn read_failed(path: &Path, e: impl ToString) -> WardError {
    WardError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn write_failed(path: &Path, e: impl ToString) -> WardError {
    WardError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
