//! Attendance tallies and grade arithmetic over rows already fetched from storage.

use std::collections::HashMap;

use crate::db::models::{AttendanceStatus, DbAssessment, DbCourse, DbScore};
use crate::types::attendance::AttendanceSummary;
use crate::types::grades::GradeSummary;

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bucket every status of a course's sessions.
pub fn tally_attendance(
    course_id: i64,
    session_count: u64,
    statuses: impl IntoIterator<Item = AttendanceStatus>,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        session_count,
        ..AttendanceSummary::empty(course_id)
    };
    for status in statuses {
        summary.record(status);
    }
    summary
}

/// Weighted 0–100 standing of one student in one course.
///
/// Each scored assessment adds `effective / max_score * weight * 100`.
/// Assessments without a score add nothing. `total_weight` falls back to 1
/// when the weights sum to zero, including a course with no assessments.
pub fn weighted_grade(
    course: &DbCourse,
    assessments: &[DbAssessment],
    scores: Vec<DbScore>,
) -> GradeSummary {
    let mut by_assessment: HashMap<i64, DbScore> =
        scores.into_iter().map(|s| (s.assessment_id, s)).collect();

    let summed: f64 = assessments.iter().map(|a| a.weight).sum();
    let total_weight = if summed == 0.0 { 1.0 } else { summed };

    let mut weighted = 0.0;
    let mut details = Vec::new();
    for assessment in assessments {
        let Some(score) = by_assessment.remove(&assessment.id) else {
            continue;
        };
        weighted += score.effective() / assessment.max_score * assessment.weight * 100.0;
        details.push(score);
    }

    GradeSummary {
        course_id: course.id,
        course_name: course.name.clone(),
        total_weight,
        weighted_score: round2(weighted),
        details,
    }
}

/// Flat mean of every raw score, or `None` when there are none.
pub fn course_average(raw_scores: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = raw_scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    (count > 0).then(|| round2(sum / count as f64))
}
