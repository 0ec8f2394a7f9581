use thiserror::Error;

use crate::config::FormLimits;
use crate::model::entity::Course;

/// Advisory field problems. Submitting only requires a title and one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("title is too short: {actual} of at least {min} characters")]
    TitleTooShort { min: usize, actual: usize },
    #[error("title is too long: {actual} of at most {max} characters")]
    TitleTooLong { max: usize, actual: usize },
    #[error("description is too long: {actual} of at most {max} characters")]
    DescriptionTooLong { max: usize, actual: usize },
}

pub(crate) fn field_issues(course: &Course, limits: &FormLimits) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    let title_len = course.title().chars().count();
    if title_len < limits.title_min_len() {
        issues.push(FieldIssue::TitleTooShort {
            min: limits.title_min_len(),
            actual: title_len,
        });
    }
    if title_len > limits.title_max_len() {
        issues.push(FieldIssue::TitleTooLong {
            max: limits.title_max_len(),
            actual: title_len,
        });
    }

    let description_len = course.description().chars().count();
    if description_len > limits.description_max_len() {
        issues.push(FieldIssue::DescriptionTooLong {
            max: limits.description_max_len(),
            actual: description_len,
        });
    }

    issues
}
