//! Assessments, scores and the grade summaries built from them.

use chrono::Utc;
use tracing::debug;

use super::models::{DbAssessment, DbCourse, DbScore};
use super::sqlite::{Storage, ensure_exists};
use crate::error::RollcallError;
use crate::service::grading;
use crate::types::grades::{AssessmentInput, CourseGradeSummary, GradeSummary, ScoreInput};

const ASSESSMENT_COLUMNS: &str = "id, course_id, name, weight, max_score, due_date, created_at";
const SCORE_COLUMNS: &str = "id, assessment_id, student_id, raw_score, adjusted_score, updated_at";

impl Storage {
    pub async fn create_assessment(
        &self,
        course_id: i64,
        input: AssessmentInput,
    ) -> Result<DbAssessment, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        let assessment: DbAssessment = sqlx::query_as(&format!(
            "INSERT INTO assessments (course_id, name, weight, max_score, due_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {ASSESSMENT_COLUMNS}"
        ))
        .bind(course_id)
        .bind(input.name)
        .bind(input.weight)
        .bind(input.max_score)
        .bind(input.due_date)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            RollcallError::conflict_on_unique(e, "Assessment with this name already exists")
        })?;
        tx.commit().await?;
        Ok(assessment)
    }

    /// Assessments of a course, newest first.
    pub async fn list_assessments(&self, course_id: i64) -> Result<Vec<DbAssessment>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        let rows = sqlx::query_as(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE course_id = ?
             ORDER BY id DESC"
        ))
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Merge a batch of scores into one assessment; same contract as
    /// [`Storage::upsert_attendance`].
    pub async fn upsert_scores(
        &self,
        assessment_id: i64,
        items: Vec<ScoreInput>,
    ) -> Result<Vec<DbScore>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "assessments", "assessment", assessment_id).await?;

        let now = Utc::now();
        let mut scores = Vec::with_capacity(items.len());
        for item in items {
            ensure_exists(&mut tx, "students", "student", item.student_id).await?;
            let score: DbScore = sqlx::query_as(&format!(
                "INSERT INTO scores (assessment_id, student_id, raw_score, adjusted_score, updated_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(assessment_id, student_id) DO UPDATE SET
                    raw_score = excluded.raw_score,
                    adjusted_score = excluded.adjusted_score,
                    updated_at = CASE
                        WHEN scores.raw_score IS excluded.raw_score
                         AND scores.adjusted_score IS excluded.adjusted_score
                        THEN scores.updated_at
                        ELSE excluded.updated_at
                    END
                 RETURNING {SCORE_COLUMNS}"
            ))
            .bind(assessment_id)
            .bind(item.student_id)
            .bind(item.raw_score)
            .bind(item.adjusted_score)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            scores.push(score);
        }

        tx.commit().await?;
        debug!(assessment_id, count = scores.len(), "score batch committed");
        Ok(scores)
    }

    /// Scores of one assessment ordered by student id.
    pub async fn list_scores(&self, assessment_id: i64) -> Result<Vec<DbScore>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "assessments", "assessment", assessment_id).await?;
        let rows = sqlx::query_as(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE assessment_id = ? ORDER BY student_id ASC"
        ))
        .bind(assessment_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Weighted grade for every course the student is enrolled in.
    pub async fn student_grades(&self, student_id: i64) -> Result<Vec<GradeSummary>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "students", "student", student_id).await?;

        let courses: Vec<DbCourse> = sqlx::query_as(
            "SELECT c.id, c.name, c.subject, c.class_name, c.teacher_name, c.created_at
             FROM courses c JOIN enrollments e ON e.course_id = c.id
             WHERE e.student_id = ? ORDER BY c.id",
        )
        .bind(student_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut summaries = Vec::with_capacity(courses.len());
        for course in courses {
            let assessments: Vec<DbAssessment> = sqlx::query_as(&format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE course_id = ? ORDER BY id"
            ))
            .bind(course.id)
            .fetch_all(&mut *tx)
            .await?;

            let scores: Vec<DbScore> = sqlx::query_as(
                "SELECT sc.id, sc.assessment_id, sc.student_id, sc.raw_score,
                        sc.adjusted_score, sc.updated_at
                 FROM scores sc JOIN assessments a ON a.id = sc.assessment_id
                 WHERE a.course_id = ? AND sc.student_id = ?",
            )
            .bind(course.id)
            .bind(student_id)
            .fetch_all(&mut *tx)
            .await?;

            summaries.push(grading::weighted_grade(&course, &assessments, scores));
        }

        tx.commit().await?;
        Ok(summaries)
    }

    /// Pooled raw-score average for a course plus its assessment list.
    pub async fn course_grades(&self, course_id: i64) -> Result<CourseGradeSummary, RollcallError> {
        let mut tx = self.begin().await?;
        let course: DbCourse = sqlx::query_as(
            "SELECT id, name, subject, class_name, teacher_name, created_at
             FROM courses WHERE id = ?",
        )
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RollcallError::not_found("course", course_id))?;

        let assessments: Vec<DbAssessment> = sqlx::query_as(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE course_id = ? ORDER BY id"
        ))
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;

        let raw_scores: Vec<(f64,)> = sqlx::query_as(
            "SELECT sc.raw_score FROM scores sc
             JOIN assessments a ON a.id = sc.assessment_id
             WHERE a.course_id = ?",
        )
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(CourseGradeSummary {
            course_id: course.id,
            course_name: course.name,
            average_score: grading::course_average(raw_scores.into_iter().map(|(s,)| s)),
            assessments,
        })
    }
}
