//! Attendance record parsing
//!
//! Reads `user_id,date,start,end` rows into an [`AttendanceCalendar`].
//! Attendance logs are operationally noisy, so a bad row never aborts the
//! parse: it is skipped, reported as a [`SkippedRow`] and logged at debug
//! level. A header row is just another unparseable row.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::num::ParseIntError;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::Result;

/// Date format of the second column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format of the third and fourth columns
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Minimum number of fields in a data row
const MIN_FIELDS: usize = 4;

pub type UserId = u32;

/// Clock-in/clock-out pair for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presence {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// One user's presence, keyed by date
pub type UserCalendar = BTreeMap<NaiveDate, Presence>;

/// Presence of all users, keyed by user id then date
pub type AttendanceCalendar = BTreeMap<UserId, UserCalendar>;

/// Reason a single attendance row was skipped
#[derive(Error, Debug)]
pub enum RowError {
    #[error("expected at least 4 fields, found {0}")]
    Arity(usize),

    #[error("invalid user id {value:?}: {source}")]
    UserId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid date {value:?}: {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid time {value:?}: {source}")]
    Time {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unreadable record: {0}")]
    Record(#[from] csv::Error),
}

/// Diagnostic for a row left out of the calendar
#[derive(Debug)]
pub struct SkippedRow {
    /// 1-based line in the source where the record starts
    pub line: u64,
    pub error: RowError,
}

/// Result of an attendance parse: the calendar plus every skipped row
#[derive(Debug, Default)]
pub struct ParsedAttendance {
    pub calendar: AttendanceCalendar,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedAttendance {
    /// Total number of (user, date) entries across all users
    pub fn entry_count(&self) -> usize {
        self.calendar.values().map(BTreeMap::len).sum()
    }

    fn accept(&mut self, user_id: UserId, date: NaiveDate, presence: Presence) {
        // Last write wins for a repeated (user, date)
        self.calendar.entry(user_id).or_default().insert(date, presence);
    }

    fn skip(&mut self, line: u64, error: RowError) {
        debug!("Problem with line {}: {}", line, error);
        self.skipped.push(SkippedRow { line, error });
    }
}

/// Parse attendance rows from any reader.
///
/// Never fails: rows that do not parse end up in
/// [`ParsedAttendance::skipped`].
pub fn parse_attendance<R: Read>(reader: R) -> ParsedAttendance {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedAttendance::default();
    // Blank lines are dropped by the reader, so lines come from record positions
    let mut last_line = 0;

    for record in csv_reader.records() {
        let position = match &record {
            Ok(record) => record.position(),
            Err(e) => e.position(),
        };
        let line = position.map_or(last_line + 1, |p| p.line());
        last_line = line;

        let outcome = record
            .map_err(RowError::from)
            .and_then(|record| parse_row(&record));

        match outcome {
            Ok((user_id, date, presence)) => parsed.accept(user_id, date, presence),
            Err(error) => parsed.skip(line, error),
        }
    }

    parsed
}

/// Open and parse an attendance CSV file.
///
/// Failing to open the file is an error; bad rows inside it are not.
pub fn load_attendance(path: &Path) -> Result<ParsedAttendance> {
    let file = File::open(path)?;
    let parsed = parse_attendance(file);

    info!(
        "Loaded attendance from {}: {} users, {} entries, {} rows skipped",
        path.display(),
        parsed.calendar.len(),
        parsed.entry_count(),
        parsed.skipped.len()
    );

    Ok(parsed)
}

fn parse_row(record: &StringRecord) -> std::result::Result<(UserId, NaiveDate, Presence), RowError> {
    if record.len() < MIN_FIELDS {
        return Err(RowError::Arity(record.len()));
    }

    let user_id = record[0].parse::<UserId>().map_err(|source| RowError::UserId {
        value: record[0].to_string(),
        source,
    })?;

    let date = NaiveDate::parse_from_str(&record[1], DATE_FORMAT).map_err(|source| {
        RowError::Date {
            value: record[1].to_string(),
            source,
        }
    })?;

    let start = parse_time(&record[2])?;
    let end = parse_time(&record[3])?;

    Ok((user_id, date, Presence { start, end }))
}

fn parse_time(value: &str) -> std::result::Result<NaiveTime, RowError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|source| RowError::Time {
        value: value.to_string(),
        source,
    })
}
