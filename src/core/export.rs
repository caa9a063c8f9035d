//! Writing exported transcripts to disk.
//!
//! Files are named by export date, `claude-session-2025-07-20.json`; a
//! second export the same day becomes `claude-session-2025-07-20-1.json`.
//! Existing files are never overwritten.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;

/// Gives up after this many same-day exports.
const MAX_ATTEMPTS: usize = 1000;

pub fn export_file_name(date: NaiveDate, attempt: usize) -> String {
    let day = date.format("%Y-%m-%d");
    if attempt == 0 {
        format!("claude-session-{day}.json")
    } else {
        format!("claude-session-{day}-{attempt}.json")
    }
}

/// Write `json` under `dir` with the first free date-based name.
pub fn write_export(dir: &Path, date: NaiveDate, json: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    for attempt in 0..MAX_ATTEMPTS {
        let path = dir.join(export_file_name(date, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes())?;
                info!("Exported session to {}", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("too many exports for {date} in {}", dir.display()),
    ))
}
