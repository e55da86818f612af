use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_negative, require_text};
use crate::db::models::{DbAssessment, DbScore};
use crate::error::RollcallError;

/// Body of `POST /courses/{id}/assessments`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentInput {
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Validate for AssessmentInput {
    fn validate(&self) -> Result<(), RollcallError> {
        require_text("name", &self.name, 120)?;
        require_non_negative("weight", self.weight)?;
        require_non_negative("max_score", self.max_score)?;
        if self.max_score == 0.0 {
            return Err(RollcallError::Validation(
                "`max_score` must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// One item of a bulk score submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreInput {
    pub student_id: i64,
    pub raw_score: f64,
    #[serde(default)]
    pub adjusted_score: Option<f64>,
}

impl Validate for ScoreInput {
    fn validate(&self) -> Result<(), RollcallError> {
        require_non_negative("raw_score", self.raw_score)?;
        if let Some(adjusted) = self.adjusted_score {
            require_non_negative("adjusted_score", adjusted)?;
        }
        Ok(())
    }
}

/// Weighted standing of one student in one course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeSummary {
    pub course_id: i64,
    pub course_name: String,
    pub total_weight: f64,
    pub weighted_score: f64,
    pub details: Vec<DbScore>,
}

/// Flat raw-score average across a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseGradeSummary {
    pub course_id: i64,
    pub course_name: String,
    pub average_score: Option<f64>,
    pub assessments: Vec<DbAssessment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_needs_positive_scale() {
        let mut a = AssessmentInput {
            name: "Midterm".to_string(),
            weight: 0.3,
            max_score: 100.0,
            due_date: None,
        };
        assert!(a.validate().is_ok());
        a.max_score = 0.0;
        assert!(a.validate().is_err());
        a.max_score = 50.0;
        a.weight = -1.0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn negative_adjusted_score_is_rejected() {
        let s = ScoreInput {
            student_id: 1,
            raw_score: 80.0,
            adjusted_score: Some(-5.0),
        };
        assert!(s.validate().is_err());
    }
}
