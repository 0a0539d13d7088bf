use std::sync::Arc;

use crate::matching::scorer::MatchScorer;
use crate::resumes::parser::ResumeExtractor;
use crate::storage::ResumeStorage;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Pluggable resume extractor. Default: AiResumeExtractor.
    pub extractor: Arc<dyn ResumeExtractor>,
    /// Pluggable match scorer. Default: AiMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
    pub storage: Arc<dyn ResumeStorage>,
}
