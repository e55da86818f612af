use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Closed set of attendance outcomes, stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

/// Account role; `Admin` may register further users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbStudent {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub grade_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbCourse {
    pub id: i64,
    pub name: String,
    pub subject: Option<String>,
    pub class_name: Option<String>,
    pub teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Enrollment joined with the enrolled student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbEnrollment {
    #[sqlx(rename = "enrollment_id")]
    pub id: i64,
    pub course_id: i64,
    pub status: String,
    #[sqlx(rename = "enrolled_at")]
    pub created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub student: DbStudent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbClassSession {
    pub id: i64,
    pub course_id: i64,
    pub session_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbAttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub memo: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbAssessment {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbScore {
    pub id: i64,
    pub assessment_id: i64,
    pub student_id: i64,
    pub raw_score: f64,
    pub adjusted_score: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl DbScore {
    /// Adjusted score when recorded, raw score otherwise.
    pub fn effective(&self) -> f64 {
        self.adjusted_score.unwrap_or(self.raw_score)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
