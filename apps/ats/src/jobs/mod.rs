//! Job postings: input normalization and bounds checks ahead of any write.

pub mod handlers;

use crate::errors::AppError;
use crate::models::job::{JobRow, JobUpdate, NewJob};

/// Trims entries, drops blanks and case-insensitive duplicates. Order is kept.
pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.is_empty() || out.iter().any(|s| s.eq_ignore_ascii_case(item)) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn check_bounds(
    experience_min: i32,
    experience_max: Option<i32>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
) -> Result<(), AppError> {
    if experience_min < 0 {
        return Err(AppError::Validation(
            "experience_min cannot be negative".to_string(),
        ));
    }
    if let Some(max) = experience_max {
        if max < experience_min {
            return Err(AppError::Validation(format!(
                "experience_max ({max}) is below experience_min ({experience_min})"
            )));
        }
    }
    if salary_min.is_some_and(|s| s < 0) || salary_max.is_some_and(|s| s < 0) {
        return Err(AppError::Validation("salary cannot be negative".to_string()));
    }
    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if max < min {
            return Err(AppError::Validation(format!(
                "salary_max ({max}) is below salary_min ({min})"
            )));
        }
    }
    Ok(())
}

/// Validates and normalizes a job before insert.
pub fn prepare_new_job(job: NewJob) -> Result<NewJob, AppError> {
    check_bounds(
        job.experience_min,
        job.experience_max,
        job.salary_min,
        job.salary_max,
    )?;

    Ok(NewJob {
        title: require_text("title", &job.title)?,
        company: require_text("company", &job.company)?,
        requirements: normalize_list(job.requirements),
        required_skills: normalize_list(job.required_skills),
        preferred_skills: normalize_list(job.preferred_skills),
        ..job
    })
}

/// Validates a partial update against the stored row it will be merged into.
pub fn prepare_update(existing: &JobRow, update: JobUpdate) -> Result<JobUpdate, AppError> {
    check_bounds(
        update.experience_min.unwrap_or(existing.experience_min),
        update.experience_max.or(existing.experience_max),
        update.salary_min.or(existing.salary_min),
        update.salary_max.or(existing.salary_max),
    )?;

    Ok(JobUpdate {
        title: update
            .title
            .as_deref()
            .map(|t| require_text("title", t))
            .transpose()?,
        company: update
            .company
            .as_deref()
            .map(|c| require_text("company", c))
            .transpose()?,
        requirements: update.requirements.map(normalize_list),
        required_skills: update.required_skills.map(normalize_list),
        preferred_skills: update.preferred_skills.map(normalize_list),
        ..update
    })
}
