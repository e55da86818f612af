use serde::Deserialize;

use super::{Validate, limit_text, require_text};
use crate::error::RollcallError;

/// Body of `POST /students` and `PUT /students/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentInput {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
}

impl Validate for StudentInput {
    fn validate(&self) -> Result<(), RollcallError> {
        require_text("full_name", &self.full_name, 120)?;
        limit_text("grade_level", self.grade_level.as_deref(), 50)?;
        if let Some(email) = self.email.as_deref() {
            limit_text("email", Some(email), 255)?;
            if !looks_like_email(email) {
                return Err(RollcallError::Validation(
                    "`email` is not a valid email address".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Body of `POST /courses` and `PUT /courses/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

impl Validate for CourseInput {
    fn validate(&self) -> Result<(), RollcallError> {
        require_text("name", &self.name, 120)?;
        limit_text("subject", self.subject.as_deref(), 120)?;
        limit_text("class_name", self.class_name.as_deref(), 120)?;
        limit_text("teacher_name", self.teacher_name.as_deref(), 120)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentInput {
    pub student_id: i64,
}

impl Validate for EnrollmentInput {
    fn validate(&self) -> Result<(), RollcallError> {
        Ok(())
    }
}
