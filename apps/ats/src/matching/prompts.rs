// Prompt constants and the tool schema for match scoring.

use serde_json::json;

use crate::ai_client::ToolSpec;

pub const MATCH_SYSTEM: &str = "You are an expert recruiter AI that matches candidates to jobs. \
    Analyze the candidate and job, then return a match score (0-100) with detailed analysis.";

/// Match prompt template. Every `{placeholder}` is replaced before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = "Match this candidate to this job:

CANDIDATE:
Name: {candidate_name}
Experience: {candidate_experience} years
Skills: {candidate_skills}
Summary: {candidate_summary}

JOB:
Title: {job_title}
Company: {job_company}
Required Skills: {required_skills}
Preferred Skills: {preferred_skills}
Experience Required: {experience_range} years
Description: {job_description}";

pub const CALCULATE_MATCH_TOOL: &str = "calculate_match";

pub fn calculate_match_tool() -> ToolSpec {
    ToolSpec {
        name: CALCULATE_MATCH_TOOL,
        description: "Calculate match score between candidate and job",
        parameters: json!({
            "type": "object",
            "properties": {
                "match_score": { "type": "number", "minimum": 0, "maximum": 100 },
                "matched_skills": { "type": "array", "items": { "type": "string" } },
                "missing_skills": { "type": "array", "items": { "type": "string" } },
                "experience_match": { "type": "boolean" },
                "notes": { "type": "string" }
            },
            "required": ["match_score", "matched_skills", "missing_skills", "experience_match"]
        }),
    }
}
