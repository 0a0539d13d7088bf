use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            "expert" => Some(SkillLevel::Expert),
            _ => None,
        }
    }
}

/// Accepts `{"name", "level"}` objects as well as bare skill names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SkillInput")]
pub struct Skill {
    pub name: String,
    pub level: Option<SkillLevel>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillInput {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, deserialize_with = "lenient::skill_level")]
        level: Option<SkillLevel>,
    },
}

impl From<SkillInput> for Skill {
    fn from(input: SkillInput) -> Self {
        match input {
            SkillInput::Name(name) => Skill { name, level: None },
            SkillInput::Detailed { name, level } => Skill { name, level },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub experience_years: i32,
    pub education: Json<Vec<EducationEntry>>,
    pub work_experience: Json<Vec<WorkExperienceEntry>>,
    pub skills: Json<Vec<Skill>>,
    pub resume_url: Option<String>,
    pub resume_text: Option<String>,
    pub parsed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Insert payload for the `candidates` table. Built only by the resume pipeline.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub experience_years: i32,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub skills: Vec<Skill>,
    pub resume_url: Option<String>,
    pub resume_text: Option<String>,
    pub parsed_at: DateTime<Utc>,
}

/// Candidate fields embedded in a match listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub skills: Vec<Skill>,
}
