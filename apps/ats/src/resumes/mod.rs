// Resume intake: text extraction, AI parsing and candidate persistence.
// All AI calls go through ai_client.

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod upload;
