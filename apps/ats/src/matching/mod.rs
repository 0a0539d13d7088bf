// Candidate–job matching: AI scoring of unscored pairs and reviewer actions.
// All AI calls go through ai_client.

pub mod handlers;
pub mod prompts;
pub mod runner;
pub mod scorer;
