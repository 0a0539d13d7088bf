// Prompt constants and the tool schema for resume extraction.

use serde_json::json;

use crate::ai_client::ToolSpec;

pub const RESUME_PARSE_SYSTEM: &str = r#"You are an expert resume parser. Extract structured information from resumes.
Return ONLY valid JSON with this exact structure:
{
  "full_name": "string",
  "email": "string",
  "phone": "string or null",
  "location": "string or null",
  "summary": "brief professional summary string",
  "experience_years": number,
  "education": [{"degree": "string", "institution": "string", "year": "string or null"}],
  "work_experience": [{"title": "string", "company": "string", "duration": "string", "description": "string"}],
  "skills": [{"name": "string", "level": "beginner|intermediate|advanced|expert"}]
}"#;

/// Resume parsing prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str =
    "Parse this resume and extract all relevant information:\n\n{resume_text}";

pub const EXTRACT_RESUME_TOOL: &str = "extract_resume_data";

pub fn extract_resume_tool() -> ToolSpec {
    ToolSpec {
        name: EXTRACT_RESUME_TOOL,
        description: "Extract structured data from a resume",
        parameters: json!({
            "type": "object",
            "properties": {
                "full_name": { "type": "string" },
                "email": { "type": "string" },
                "phone": { "type": "string" },
                "location": { "type": "string" },
                "summary": { "type": "string" },
                "experience_years": { "type": "number" },
                "education": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "degree": { "type": "string" },
                            "institution": { "type": "string" },
                            "year": { "type": "string" }
                        }
                    }
                },
                "work_experience": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "company": { "type": "string" },
                            "duration": { "type": "string" },
                            "description": { "type": "string" }
                        }
                    }
                },
                "skills": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "level": {
                                "type": "string",
                                "enum": ["beginner", "intermediate", "advanced", "expert"]
                            }
                        }
                    }
                }
            },
            "required": ["full_name", "email", "skills"]
        }),
    }
}
