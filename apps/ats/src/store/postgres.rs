use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, NewCandidate};
use crate::models::job::{JobRow, JobStatus, JobUpdate, NewJob};
use crate::models::matches::{MatchDetail, MatchFilter, MatchRow, MatchStatus, NewMatch};
use crate::store::{PipelineCounts, Store};

/// `Store` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, sqlx::Error> {
        sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (full_name, email, phone, location, summary, experience_years,
                 education, work_experience, skills, resume_url, resume_text, parsed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&candidate.full_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.location)
        .bind(&candidate.summary)
        .bind(candidate.experience_years)
        .bind(Json(&candidate.education))
        .bind(Json(&candidate.work_experience))
        .bind(Json(&candidate.skills))
        .bind(&candidate.resume_url)
        .bind(&candidate.resume_text)
        .bind(candidate.parsed_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, sqlx::Error> {
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error> {
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn active_jobs(&self, id: Option<Uuid>) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE status = $1 AND ($2::uuid IS NULL OR id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(JobStatus::Active)
        .bind(id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_job(&self, job: NewJob) -> Result<JobRow, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (title, company, location, description, requirements, required_skills,
                 preferred_skills, experience_min, experience_max, salary_min, salary_max, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.required_skills)
        .bind(&job.preferred_skills)
        .bind(job.experience_min)
        .bind(job.experience_max)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.status)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_job(
        &self,
        id: Uuid,
        update: JobUpdate,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title            = COALESCE($2, title),
                company          = COALESCE($3, company),
                location         = COALESCE($4, location),
                description      = COALESCE($5, description),
                requirements     = COALESCE($6, requirements),
                required_skills  = COALESCE($7, required_skills),
                preferred_skills = COALESCE($8, preferred_skills),
                experience_min   = COALESCE($9, experience_min),
                experience_max   = COALESCE($10, experience_max),
                salary_min       = COALESCE($11, salary_min),
                salary_max       = COALESCE($12, salary_max),
                status           = COALESCE($13, status),
                updated_at       = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.title)
        .bind(update.company)
        .bind(update.location)
        .bind(update.description)
        .bind(update.requirements)
        .bind(update.required_skills)
        .bind(update.preferred_skills)
        .bind(update.experience_min)
        .bind(update.experience_max)
        .bind(update.salary_min)
        .bind(update.salary_max)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn match_exists(&self, candidate_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE candidate_id = $1 AND job_id = $2)",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_match(&self, new_match: NewMatch) -> Result<Option<MatchRow>, sqlx::Error> {
        // The unique (candidate_id, job_id) constraint settles concurrent runs.
        sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches
                (candidate_id, job_id, match_score, matched_skills, missing_skills,
                 experience_match, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (candidate_id, job_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(new_match.candidate_id)
        .bind(new_match.job_id)
        .bind(new_match.match_score)
        .bind(&new_match.matched_skills)
        .bind(&new_match.missing_skills)
        .bind(new_match.experience_match)
        .bind(&new_match.notes)
        .bind(MatchStatus::Pending)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchDetail>, sqlx::Error> {
        sqlx::query_as::<_, MatchDetail>(
            r#"
            SELECT m.*,
                   json_build_object(
                       'id', c.id, 'full_name', c.full_name,
                       'email', c.email, 'skills', c.skills
                   ) AS candidate,
                   json_build_object(
                       'id', j.id, 'title', j.title,
                       'company', j.company, 'required_skills', j.required_skills
                   ) AS job
            FROM matches m
            JOIN candidates c ON c.id = m.candidate_id
            JOIN jobs j ON j.id = m.job_id
            WHERE ($1::match_status IS NULL OR m.status = $1)
              AND ($2::uuid IS NULL OR m.job_id = $2)
              AND ($3::uuid IS NULL OR m.candidate_id = $3)
            ORDER BY m.match_score DESC, m.created_at DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.job_id)
        .bind(filter.candidate_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_match_status(
        &self,
        id: Uuid,
        status: MatchStatus,
    ) -> Result<Option<MatchRow>, sqlx::Error> {
        sqlx::query_as::<_, MatchRow>(
            "UPDATE matches SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn pipeline_counts(&self) -> Result<PipelineCounts, sqlx::Error> {
        sqlx::query_as::<_, PipelineCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM candidates)                            AS total_candidates,
                (SELECT COUNT(*) FROM candidates WHERE parsed_at IS NOT NULL) AS resumes_parsed,
                (SELECT COUNT(*) FROM jobs WHERE status = 'active')         AS active_jobs,
                (SELECT COUNT(*) FROM matches)                               AS total_matches,
                (SELECT COUNT(*) FROM matches WHERE status = 'pending')      AS pending_matches,
                (SELECT AVG(match_score)::float8 FROM matches)               AS average_match_score
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn candidate_skill_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT skill->>'name'
            FROM candidates c
            CROSS JOIN LATERAL jsonb_array_elements(
                CASE WHEN jsonb_typeof(c.skills) = 'array' THEN c.skills ELSE '[]'::jsonb END
            ) AS skill
            WHERE skill->>'name' IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
