use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::repository::{AssessmentRow, AssessmentStore, StoreError};

/// Append-only CSV file store. The header row is written with the first record.
#[derive(Debug)]
pub struct CsvAssessmentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvAssessmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_rows(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false)
    }
}

impl AssessmentStore for CsvAssessmentStore {
    fn append_record(&self, row: &AssessmentRow) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let write_header = !self.has_rows();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        debug!(
            path = %self.path.display(),
            assessment_id = %row.assessment_id,
            "appended assessment row"
        );
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<AssessmentRow>, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        if !self.has_rows() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader
            .deserialize::<AssessmentRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Render rows as a CSV document with a header line.
pub fn export_csv(rows: &[AssessmentRow]) -> Result<String, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| StoreError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| StoreError::Unavailable(err.to_string()))
}
