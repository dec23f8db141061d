use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

use crate::rates::RateError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    pub delimiter: String,
}

impl Default for TableProfile {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl TableProfile {
    fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid created_account value: {0}")]
    InvalidLabel(String),
    #[error("Duplicate participant_id: {0}")]
    DuplicateParticipant(String),
    #[error("Time with employer overflows on row {row}: {years} years, {months} months")]
    TenureOverflow { row: usize, years: u32, months: u32 },
    #[error("No data rows")]
    NoDataRows,
    #[error(transparent)]
    Rates(#[from] RateError),
}

/// Reads every row of a headed table into `T`, after checking that each of
/// `required` is present. Other columns are ignored; a cell that does not
/// fit its declared type fails the import.
pub(crate) fn read_rows<T: DeserializeOwned, R: Read>(
    data: R,
    profile: &TableProfile,
    required: &[&str],
) -> Result<Vec<T>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(profile.delimiter_byte())
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if let Some(missing) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(ImportError::MissingColumn(missing.to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows.push(record.deserialize(Some(&headers))?);
    }

    if rows.is_empty() {
        return Err(ImportError::NoDataRows);
    }
    Ok(rows)
}
