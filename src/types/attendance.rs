use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Validate, limit_text};
use crate::db::models::AttendanceStatus;
use crate::error::RollcallError;

/// Body of `POST /courses/{id}/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInput {
    pub session_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Validate for SessionInput {
    fn validate(&self) -> Result<(), RollcallError> {
        limit_text("start_time", self.start_time.as_deref(), 10)?;
        limit_text("end_time", self.end_time.as_deref(), 10)?;
        limit_text("topic", self.topic.as_deref(), 255)
    }
}

/// One item of a bulk attendance submission.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceInput {
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Validate for AttendanceInput {
    fn validate(&self) -> Result<(), RollcallError> {
        limit_text("memo", self.memo.as_deref(), 255)
    }
}

/// Per-course tally of attendance outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub course_id: i64,
    pub session_count: u64,
    pub present: u64,
    pub late: u64,
    pub absent: u64,
    pub excused: u64,
}

impl AttendanceSummary {
    pub fn empty(course_id: i64) -> Self {
        Self {
            course_id,
            ..Self::default()
        }
    }

    /// Count one record into its bucket.
    pub fn record(&mut self, status: AttendanceStatus) {
        let bucket = match status {
            AttendanceStatus::Present => &mut self.present,
            AttendanceStatus::Late => &mut self.late,
            AttendanceStatus::Absent => &mut self.absent,
            AttendanceStatus::Excused => &mut self.excused,
        };
        *bucket += 1;
    }

    pub fn total_records(&self) -> u64 {
        self.present + self.late + self.absent + self.excused
    }
}
