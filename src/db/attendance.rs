//! Class sessions and per-session attendance.

use chrono::Utc;
use tracing::debug;

use super::models::{AttendanceStatus, DbAttendanceRecord, DbClassSession};
use super::sqlite::{Storage, ensure_exists};
use crate::error::RollcallError;
use crate::service::grading;
use crate::types::attendance::{AttendanceInput, AttendanceSummary, SessionInput};

const SESSION_COLUMNS: &str = "id, course_id, session_date, start_time, end_time, topic, created_at";
const ATTENDANCE_COLUMNS: &str = "id, session_id, student_id, status, memo, updated_at";

impl Storage {
    pub async fn create_session(
        &self,
        course_id: i64,
        input: SessionInput,
    ) -> Result<DbClassSession, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        let session: DbClassSession = sqlx::query_as(&format!(
            "INSERT INTO sessions (course_id, session_date, start_time, end_time, topic, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {SESSION_COLUMNS}"
        ))
        .bind(course_id)
        .bind(input.session_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.topic)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RollcallError::conflict_on_unique(e, "Session already exists for this date"))?;
        tx.commit().await?;
        Ok(session)
    }

    /// Sessions of a course, most recent date first.
    pub async fn list_sessions(&self, course_id: i64) -> Result<Vec<DbClassSession>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        let rows = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE course_id = ?
             ORDER BY session_date DESC, id DESC"
        ))
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Merge a batch of attendance marks into one session.
    ///
    /// Existing (session, student) rows are overwritten in place, missing ones
    /// inserted. The batch commits once; any failure leaves the session untouched.
    /// `updated_at` only moves when status or memo actually changed.
    pub async fn upsert_attendance(
        &self,
        session_id: i64,
        items: Vec<AttendanceInput>,
    ) -> Result<Vec<DbAttendanceRecord>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "sessions", "session", session_id).await?;

        let now = Utc::now();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            ensure_exists(&mut tx, "students", "student", item.student_id).await?;
            let record: DbAttendanceRecord = sqlx::query_as(&format!(
                "INSERT INTO attendance_records (session_id, student_id, status, memo, updated_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(session_id, student_id) DO UPDATE SET
                    status = excluded.status,
                    memo = excluded.memo,
                    updated_at = CASE
                        WHEN attendance_records.status IS excluded.status
                         AND attendance_records.memo IS excluded.memo
                        THEN attendance_records.updated_at
                        ELSE excluded.updated_at
                    END
                 RETURNING {ATTENDANCE_COLUMNS}"
            ))
            .bind(session_id)
            .bind(item.student_id)
            .bind(item.status)
            .bind(item.memo)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            records.push(record);
        }

        tx.commit().await?;
        debug!(session_id, count = records.len(), "attendance batch committed");
        Ok(records)
    }

    /// Attendance of one session ordered by student id.
    pub async fn list_attendance(
        &self,
        session_id: i64,
    ) -> Result<Vec<DbAttendanceRecord>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "sessions", "session", session_id).await?;
        let rows = sqlx::query_as(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records
             WHERE session_id = ? ORDER BY student_id ASC"
        ))
        .bind(session_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn attendance_summary(
        &self,
        course_id: i64,
    ) -> Result<AttendanceSummary, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;

        let (session_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE course_id = ?")
                .bind(course_id)
                .fetch_one(&mut *tx)
                .await?;
        if session_count == 0 {
            tx.commit().await?;
            return Ok(AttendanceSummary::empty(course_id));
        }

        let statuses: Vec<(AttendanceStatus,)> = sqlx::query_as(
            "SELECT ar.status FROM attendance_records ar
             JOIN sessions s ON s.id = ar.session_id
             WHERE s.course_id = ?",
        )
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(grading::tally_attendance(
            course_id,
            session_count as u64,
            statuses.into_iter().map(|(status,)| status),
        ))
    }
}
