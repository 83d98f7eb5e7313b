//! Read operations over the attendance and directory sources
//!
//! [`PresenceAnalyzer`] is the composition root of the core: it owns the
//! source paths and the parse caches, and exposes the four reports served
//! by the HTTP layer. Unknown users yield empty reports, never errors.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheKey, MemoCache};
use crate::config::AppConfig;
use crate::directory::{load_directory, UserDirectory};
use crate::records::{load_attendance, AttendanceCalendar, UserCalendar, UserId};
use crate::stats::Mean;
use crate::time::{Clock, SystemClock};
use crate::weekday::{group_by_weekday, mean_by_weekday, start_end_mean_time, sum_by_weekday, StartEndMean};
use crate::{Error, Result};

/// Locations of the two input files
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSources {
    pub data_csv: PathBuf,
    pub users_xml: PathBuf,
}

/// Entry of the user listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub name: String,
    pub avatar: String,
}

pub struct PresenceAnalyzer {
    sources: DataSources,
    calendars: MemoCache<Arc<AttendanceCalendar>>,
    directories: MemoCache<Arc<UserDirectory>>,
}

impl PresenceAnalyzer {
    pub fn new(sources: DataSources, ttl: Duration) -> Self {
        Self::with_clock(sources, ttl, Arc::new(SystemClock))
    }

    /// Analyzer whose caches expire according to `clock`
    pub fn with_clock(sources: DataSources, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources,
            calendars: MemoCache::with_clock(ttl, clock.clone()),
            directories: MemoCache::with_clock(ttl, clock),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DataSources {
                data_csv: config.data_csv.clone(),
                users_xml: config.users_xml.clone(),
            },
            config.cache_ttl,
        )
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Parsed attendance calendar, cached for the configured TTL
    pub fn attendance(&self) -> Result<Arc<AttendanceCalendar>> {
        let path = &self.sources.data_csv;
        self.calendars
            .get_or_try_insert_with(CacheKey::new("get_data", path), || {
                load_attendance(path).map(|parsed| Arc::new(parsed.calendar))
            })
    }

    /// Parsed user directory, cached for the configured TTL
    pub fn directory(&self) -> Result<Arc<UserDirectory>> {
        let path = &self.sources.users_xml;
        self.directories
            .get_or_try_insert_with(CacheKey::new("get_users", path), || {
                load_directory(path).map(Arc::new)
            })
    }

    /// All users from the directory, ordered by id
    pub fn list_users(&self) -> Result<Vec<UserSummary>> {
        let directory = self.directory()?;
        Ok(directory
            .iter()
            .map(|(user_id, info)| UserSummary {
                user_id: *user_id,
                name: info.name.clone(),
                avatar: info.avatar.clone(),
            })
            .collect())
    }

    /// Mean presence per weekday, or an empty list for an unknown user
    pub fn mean_time_weekday(&self, user_id: UserId) -> Result<Vec<(&'static str, Mean)>> {
        let calendar = self.attendance()?;
        Ok(match user_calendar(&calendar, user_id) {
            Some(user) => mean_by_weekday(&group_by_weekday(user)),
            None => Vec::new(),
        })
    }

    /// Total presence per weekday, or an empty list for an unknown user
    pub fn presence_weekday(&self, user_id: UserId) -> Result<Vec<(&'static str, i64)>> {
        let calendar = self.attendance()?;
        Ok(match user_calendar(&calendar, user_id) {
            Some(user) => sum_by_weekday(&group_by_weekday(user)),
            None => Vec::new(),
        })
    }

    /// Mean start/end per weekday, or an empty list for an unknown user
    pub fn presence_start_end(&self, user_id: UserId) -> Result<Vec<StartEndMean>> {
        let calendar = self.attendance()?;
        match start_end_mean_time(&calendar, user_id) {
            Ok(result) => Ok(result),
            Err(Error::NotFound(_)) => {
                debug!("User {} not found!", user_id);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

fn user_calendar(calendar: &AttendanceCalendar, user_id: UserId) -> Option<&UserCalendar> {
    let user = calendar.get(&user_id);
    if user.is_none() {
        debug!("User {} not found!", user_id);
    }
    user
}
