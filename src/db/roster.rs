//! Students, courses and the enrollments linking them.

use chrono::Utc;

use super::models::{DbCourse, DbEnrollment, DbStudent};
use super::sqlite::{Storage, ensure_exists};
use crate::error::RollcallError;
use crate::types::roster::{CourseInput, StudentInput};

const STUDENT_COLUMNS: &str = "id, full_name, email, grade_level, created_at";
const COURSE_COLUMNS: &str = "id, name, subject, class_name, teacher_name, created_at";
const DUPLICATE_EMAIL: &str = "A student with this email already exists";

impl Storage {
    pub async fn create_student(&self, input: StudentInput) -> Result<DbStudent, RollcallError> {
        let mut tx = self.begin().await?;
        let student: DbStudent = sqlx::query_as(&format!(
            "INSERT INTO students (full_name, email, grade_level, created_at)
             VALUES (?, ?, ?, ?) RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(input.full_name)
        .bind(input.email)
        .bind(input.grade_level)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RollcallError::conflict_on_unique(e, DUPLICATE_EMAIL))?;
        tx.commit().await?;
        Ok(student)
    }

    pub async fn list_students(&self) -> Result<Vec<DbStudent>, RollcallError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_student(&self, id: i64) -> Result<DbStudent, RollcallError> {
        sqlx::query_as(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| RollcallError::not_found("student", id))
    }

    /// Replace every mutable field of a student.
    pub async fn update_student(
        &self,
        id: i64,
        input: StudentInput,
    ) -> Result<DbStudent, RollcallError> {
        let mut tx = self.begin().await?;
        let student: Option<DbStudent> = sqlx::query_as(&format!(
            "UPDATE students SET full_name = ?, email = ?, grade_level = ?
             WHERE id = ? RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(input.full_name)
        .bind(input.email)
        .bind(input.grade_level)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RollcallError::conflict_on_unique(e, DUPLICATE_EMAIL))?;
        let student = student.ok_or_else(|| RollcallError::not_found("student", id))?;
        tx.commit().await?;
        Ok(student)
    }

    /// Delete a student together with their enrollments, attendance and scores.
    pub async fn delete_student(&self, id: i64) -> Result<(), RollcallError> {
        let mut tx = self.begin().await?;
        let done = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(RollcallError::not_found("student", id));
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_course(&self, input: CourseInput) -> Result<DbCourse, RollcallError> {
        let mut tx = self.begin().await?;
        let course: DbCourse = sqlx::query_as(&format!(
            "INSERT INTO courses (name, subject, class_name, teacher_name, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(input.name)
        .bind(input.subject)
        .bind(input.class_name)
        .bind(input.teacher_name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(course)
    }

    pub async fn list_courses(&self) -> Result<Vec<DbCourse>, RollcallError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_course(&self, id: i64) -> Result<DbCourse, RollcallError> {
        sqlx::query_as(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| RollcallError::not_found("course", id))
    }

    pub async fn update_course(
        &self,
        id: i64,
        input: CourseInput,
    ) -> Result<DbCourse, RollcallError> {
        let mut tx = self.begin().await?;
        let course: Option<DbCourse> = sqlx::query_as(&format!(
            "UPDATE courses SET name = ?, subject = ?, class_name = ?, teacher_name = ?
             WHERE id = ? RETURNING {COURSE_COLUMNS}"
        ))
        .bind(input.name)
        .bind(input.subject)
        .bind(input.class_name)
        .bind(input.teacher_name)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let course = course.ok_or_else(|| RollcallError::not_found("course", id))?;
        tx.commit().await?;
        Ok(course)
    }

    /// Delete a course with its enrollments, sessions, attendance, assessments and scores.
    pub async fn delete_course(&self, id: i64) -> Result<(), RollcallError> {
        let mut tx = self.begin().await?;
        let done = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(RollcallError::not_found("course", id));
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn enroll_student(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<DbEnrollment, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        ensure_exists(&mut tx, "students", "student", student_id).await?;

        let (enrollment_id,): (i64,) = sqlx::query_as(
            "INSERT INTO enrollments (course_id, student_id, status, created_at)
             VALUES (?, ?, 'active', ?) RETURNING id",
        )
        .bind(course_id)
        .bind(student_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            RollcallError::conflict_on_unique(e, "Student already enrolled for this course")
        })?;

        let enrollment: DbEnrollment = sqlx::query_as(&enrollment_select("e.id = ?"))
            .bind(enrollment_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(enrollment)
    }

    pub async fn list_enrollments(&self, course_id: i64) -> Result<Vec<DbEnrollment>, RollcallError> {
        let mut tx = self.begin().await?;
        ensure_exists(&mut tx, "courses", "course", course_id).await?;
        let rows = sqlx::query_as(&format!(
            "{} ORDER BY e.id DESC",
            enrollment_select("e.course_id = ?")
        ))
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn unenroll_student(&self, course_id: i64, student_id: i64) -> Result<(), RollcallError> {
        let mut tx = self.begin().await?;
        let done = sqlx::query("DELETE FROM enrollments WHERE course_id = ? AND student_id = ?")
            .bind(course_id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(RollcallError::NotFound(format!(
                "student {student_id} is not enrolled in course {course_id}"
            )));
        }
        tx.commit().await?;
        Ok(())
    }
}

fn enrollment_select(filter: &str) -> String {
    format!(
        "SELECT e.id AS enrollment_id, e.course_id, e.status, e.created_at AS enrolled_at,
                s.id, s.full_name, s.email, s.grade_level, s.created_at
         FROM enrollments e JOIN students s ON s.id = e.student_id
         WHERE {filter}"
    )
}
