//! Request and response payloads exchanged over HTTP.

pub mod attendance;
pub mod auth;
pub mod grades;
pub mod roster;

use crate::error::RollcallError;

/// Field-level checks run on a decoded payload before it reaches storage.
pub trait Validate {
    fn validate(&self) -> Result<(), RollcallError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), RollcallError> {
        self.iter().enumerate().try_for_each(|(idx, item)| {
            item.validate()
                .map_err(|e| match e {
                    RollcallError::Validation(msg) => {
                        RollcallError::Validation(format!("item {idx}: {msg}"))
                    }
                    other => other,
                })
        })
    }
}

pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), RollcallError> {
    if value.trim().is_empty() {
        return Err(RollcallError::Validation(format!("`{field}` must not be empty")));
    }
    limit_text(field, Some(value), max_len)
}

pub(crate) fn limit_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), RollcallError> {
    match value {
        Some(v) if v.chars().count() > max_len => Err(RollcallError::Validation(format!(
            "`{field}` must be at most {max_len} characters"
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<(), RollcallError> {
    if !value.is_finite() || value < 0.0 {
        return Err(RollcallError::Validation(format!(
            "`{field}` must be a finite number >= 0"
        )));
    }
    Ok(())
}
