//! IO implementations for `EventLog`

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::core::event_data::case_centric::xes::{import_xes, XESParseError};
use crate::core::event_data::case_centric::EventLog;
use crate::core::io::Importable;

/// Error type for `EventLog` IO operations
#[derive(Debug, Error)]
pub enum EventLogIOError {
    /// IO Error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// XES Parsing Error
    #[error("XES Error: {0}")]
    Xes(#[from] XESParseError),
    /// JSON Parsing Error
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    /// Unsupported Format
    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
}

impl Importable for EventLog {
    type Error = EventLogIOError;

    fn import_from_reader<R: Read>(reader: R, format: &str) -> Result<Self, Self::Error> {
        match format {
            _ if format.ends_with("json") => {
                let log: EventLog = serde_json::from_reader(reader)?;
                Ok(log)
            }
            _ if format.ends_with("xes.gz") => {
                let gz = flate2::read::GzDecoder::new(reader);
                Ok(import_xes(BufReader::new(gz))?)
            }
            _ if format.ends_with("xes") => Ok(import_xes(BufReader::new(reader))?),
            _ => Err(EventLogIOError::UnsupportedFormat(format.to_string())),
        }
    }
}

///
/// Import an [`EventLog`] from a JSON file given by a filepath
///
/// See also [`import_event_log_json_from_slice`].
///
pub fn import_event_log_json_from_path<P: AsRef<Path>>(path: P) -> Result<EventLog, EventLogIOError> {
    let reader: BufReader<File> = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

///
/// Import an [`EventLog`] from a JSON byte slice
///
/// See also [`import_event_log_json_from_path`].
///
pub fn import_event_log_json_from_slice(slice: &[u8]) -> Result<EventLog, EventLogIOError> {
    Ok(serde_json::from_slice(slice)?)
}
