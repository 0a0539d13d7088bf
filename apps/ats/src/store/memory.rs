use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, CandidateSummary, NewCandidate, Skill};
use crate::models::job::{JobRow, JobStatus, JobSummary, JobUpdate, NewJob};
use crate::models::matches::{MatchDetail, MatchFilter, MatchRow, MatchStatus, NewMatch};
use crate::store::{PipelineCounts, Store};

#[derive(Default)]
struct Tables {
    candidates: Vec<CandidateRow>,
    jobs: Vec<JobRow>,
    matches: Vec<MatchRow>,
    writes: usize,
}

/// In-memory `Store` for tests. Mirrors the ordering and uniqueness rules of
/// the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: bool,
    stale_exists: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose list/get calls all fail.
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// A store whose `match_exists` always answers `false`, as seen by a run
    /// racing another one that already inserted the pair.
    pub fn with_stale_exists() -> Self {
        Self {
            stale_exists: true,
            ..Self::default()
        }
    }

    /// Number of successful inserts and updates so far.
    pub fn writes(&self) -> usize {
        self.tables.lock().unwrap().writes
    }

    pub fn candidate_count(&self) -> usize {
        self.tables.lock().unwrap().candidates.len()
    }

    pub fn match_count(&self) -> usize {
        self.tables.lock().unwrap().matches.len()
    }

    pub fn seed_candidate(&self, full_name: &str, skills: &[&str], experience_years: i32) -> Uuid {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now() + Duration::milliseconds(tables.candidates.len() as i64);
        let id = Uuid::new_v4();
        tables.candidates.push(CandidateRow {
            id,
            user_id: None,
            full_name: full_name.to_string(),
            email: format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
            phone: None,
            location: None,
            summary: None,
            experience_years,
            education: Json(vec![]),
            work_experience: Json(vec![]),
            skills: Json(
                skills
                    .iter()
                    .map(|name| Skill {
                        name: name.to_string(),
                        level: None,
                    })
                    .collect(),
            ),
            resume_url: None,
            resume_text: None,
            parsed_at: Some(now),
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_job(&self, title: &str, status: JobStatus, required_skills: &[&str]) -> Uuid {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now() + Duration::milliseconds(tables.jobs.len() as i64);
        let id = Uuid::new_v4();
        tables.jobs.push(JobRow {
            id,
            user_id: None,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            description: None,
            requirements: vec![],
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
            preferred_skills: vec![],
            experience_min: 0,
            experience_max: None,
            salary_min: None,
            salary_max: None,
            status,
            created_at: now,
            updated_at: now,
        });
        id
    }

    fn check_reads(&self) -> Result<(), sqlx::Error> {
        if self.fail_reads {
            Err(sqlx::Error::PoolClosed)
        } else {
            Ok(())
        }
    }
}

fn newest_first<T, F>(rows: &mut [T], created_at: F)
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = CandidateRow {
            id: Uuid::new_v4(),
            user_id: None,
            full_name: candidate.full_name,
            email: candidate.email,
            phone: candidate.phone,
            location: candidate.location,
            summary: candidate.summary,
            experience_years: candidate.experience_years,
            education: Json(candidate.education),
            work_experience: Json(candidate.work_experience),
            skills: Json(candidate.skills),
            resume_url: candidate.resume_url,
            resume_text: candidate.resume_text,
            parsed_at: Some(candidate.parsed_at),
            created_at: now,
            updated_at: now,
        };
        tables.candidates.push(row.clone());
        tables.writes += 1;
        Ok(row)
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, sqlx::Error> {
        self.check_reads()?;
        let mut rows = self.tables.lock().unwrap().candidates.clone();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        self.check_reads()?;
        let mut rows = self.tables.lock().unwrap().jobs.clone();
        newest_first(&mut rows, |j| j.created_at);
        Ok(rows)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn active_jobs(&self, id: Option<Uuid>) -> Result<Vec<JobRow>, sqlx::Error> {
        let mut rows: Vec<JobRow> = self
            .list_jobs()
            .await?
            .into_iter()
            .filter(|j| j.status == JobStatus::Active)
            .collect();
        if let Some(id) = id {
            rows.retain(|j| j.id == id);
        }
        Ok(rows)
    }

    async fn create_job(&self, job: NewJob) -> Result<JobRow, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now() + Duration::milliseconds(tables.jobs.len() as i64);
        let row = JobRow {
            id: Uuid::new_v4(),
            user_id: None,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            requirements: job.requirements,
            required_skills: job.required_skills,
            preferred_skills: job.preferred_skills,
            experience_min: job.experience_min,
            experience_max: job.experience_max,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            status: job.status,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(row.clone());
        tables.writes += 1;
        Ok(row)
    }

    async fn update_job(
        &self,
        id: Uuid,
        update: JobUpdate,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let Some(job) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        if let Some(v) = update.title {
            job.title = v;
        }
        if let Some(v) = update.company {
            job.company = v;
        }
        if let Some(v) = update.location {
            job.location = Some(v);
        }
        if let Some(v) = update.description {
            job.description = Some(v);
        }
        if let Some(v) = update.requirements {
            job.requirements = v;
        }
        if let Some(v) = update.required_skills {
            job.required_skills = v;
        }
        if let Some(v) = update.preferred_skills {
            job.preferred_skills = v;
        }
        if let Some(v) = update.experience_min {
            job.experience_min = v;
        }
        if let Some(v) = update.experience_max {
            job.experience_max = Some(v);
        }
        if let Some(v) = update.salary_min {
            job.salary_min = Some(v);
        }
        if let Some(v) = update.salary_max {
            job.salary_max = Some(v);
        }
        if let Some(v) = update.status {
            job.status = v;
        }
        job.updated_at = Utc::now();
        let row = job.clone();
        tables.writes += 1;
        Ok(Some(row))
    }

    async fn match_exists(&self, candidate_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
        if self.stale_exists {
            return Ok(false);
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .matches
            .iter()
            .any(|m| m.candidate_id == candidate_id && m.job_id == job_id))
    }

    async fn insert_match(&self, new_match: NewMatch) -> Result<Option<MatchRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let duplicate = tables
            .matches
            .iter()
            .any(|m| m.candidate_id == new_match.candidate_id && m.job_id == new_match.job_id);
        if duplicate {
            return Ok(None);
        }
        let now = Utc::now();
        let row = MatchRow {
            id: Uuid::new_v4(),
            candidate_id: new_match.candidate_id,
            job_id: new_match.job_id,
            match_score: new_match.match_score,
            matched_skills: new_match.matched_skills,
            missing_skills: new_match.missing_skills,
            experience_match: new_match.experience_match,
            notes: new_match.notes,
            status: MatchStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.matches.push(row.clone());
        tables.writes += 1;
        Ok(Some(row))
    }

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchDetail>, sqlx::Error> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        let mut details: Vec<MatchDetail> = tables
            .matches
            .iter()
            .filter(|m| filter.status.map_or(true, |s| m.status == s))
            .filter(|m| filter.job_id.map_or(true, |id| m.job_id == id))
            .filter(|m| filter.candidate_id.map_or(true, |id| m.candidate_id == id))
            .filter_map(|m| {
                let candidate = tables.candidates.iter().find(|c| c.id == m.candidate_id)?;
                let job = tables.jobs.iter().find(|j| j.id == m.job_id)?;
                Some(MatchDetail {
                    record: m.clone(),
                    candidate: Json(CandidateSummary {
                        id: candidate.id,
                        full_name: candidate.full_name.clone(),
                        email: candidate.email.clone(),
                        skills: candidate.skills.0.clone(),
                    }),
                    job: Json(JobSummary {
                        id: job.id,
                        title: job.title.clone(),
                        company: job.company.clone(),
                        required_skills: job.required_skills.clone(),
                    }),
                })
            })
            .collect();
        details.sort_by_key(|d| std::cmp::Reverse(d.record.match_score));
        Ok(details)
    }

    async fn update_match_status(
        &self,
        id: Uuid,
        status: MatchStatus,
    ) -> Result<Option<MatchRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let Some(m) = tables.matches.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        m.status = status;
        m.updated_at = Utc::now();
        let row = m.clone();
        tables.writes += 1;
        Ok(Some(row))
    }

    async fn pipeline_counts(&self) -> Result<PipelineCounts, sqlx::Error> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        let scores: Vec<f64> = tables.matches.iter().map(|m| m.match_score as f64).collect();
        Ok(PipelineCounts {
            total_candidates: tables.candidates.len() as i64,
            resumes_parsed: tables
                .candidates
                .iter()
                .filter(|c| c.parsed_at.is_some())
                .count() as i64,
            active_jobs: tables
                .jobs
                .iter()
                .filter(|j| j.status == JobStatus::Active)
                .count() as i64,
            total_matches: tables.matches.len() as i64,
            pending_matches: tables
                .matches
                .iter()
                .filter(|m| m.status == MatchStatus::Pending)
                .count() as i64,
            average_match_score: if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            },
        })
    }

    async fn candidate_skill_names(&self) -> Result<Vec<String>, sqlx::Error> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .candidates
            .iter()
            .flat_map(|c| c.skills.iter().map(|s| s.name.clone()))
            .collect())
    }
}
