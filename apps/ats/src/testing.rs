//! Deterministic stand-ins for the AI capabilities and object storage, plus a
//! harness that wires them into an `AppState`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::ai_client::AiError;
use crate::errors::AppError;
use crate::matching::scorer::{MatchAssessment, MatchScorer};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::resumes::parser::ResumeExtractor;
use crate::state::AppState;
use crate::storage::ResumeStorage;
use crate::store::memory::MemoryStore;

pub struct StubExtractor {
    answer: Result<Value, fn() -> AiError>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn returning(value: Value) -> Self {
        Self {
            answer: Ok(value),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: fn() -> AiError) -> Self {
        Self {
            answer: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeExtractor for StubExtractor {
    async fn extract(&self, _resume_text: &str) -> Result<Value, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(value) => Ok(value.clone()),
            Err(make_err) => Err(make_err()),
        }
    }
}

/// Scores every pair with the same value. Can be told to fail one call.
pub struct StubScorer {
    score: f64,
    fail_on_call: Option<(usize, fn() -> AiError)>,
    calls: AtomicUsize,
}

impl StubScorer {
    pub fn scoring(score: f64) -> Self {
        Self {
            score,
            fail_on_call: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails the `n`-th call (1-based) and scores 60 otherwise.
    pub fn failing_on_call(n: usize, err: fn() -> AiError) -> Self {
        Self {
            score: 60.0,
            fail_on_call: Some((n, err)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchScorer for StubScorer {
    async fn score(
        &self,
        candidate: &CandidateRow,
        job: &JobRow,
    ) -> Result<MatchAssessment, AiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, make_err)) = self.fail_on_call {
            if n == call {
                return Err(make_err());
            }
        }

        let skills = candidate.skill_names();
        let (matched, missing): (Vec<String>, Vec<String>) = job
            .required_skills
            .iter()
            .cloned()
            .partition(|s| skills.iter().any(|c| c.eq_ignore_ascii_case(s)));

        Ok(MatchAssessment {
            match_score: self.score,
            matched_skills: matched,
            missing_skills: missing,
            experience_match: candidate.experience_years >= job.experience_min,
            notes: Some(format!("{} vs {}", candidate.full_name, job.title)),
        })
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryStorage {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ResumeStorage for MemoryStorage {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<String, AppError> {
        self.objects.lock().unwrap().push((key.to_string(), body));
        Ok(format!("http://storage.test/resumes-bucket/{key}"))
    }
}

/// Keeps typed handles to the fakes while handing out an `AppState`.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub extractor: Arc<StubExtractor>,
    pub scorer: Arc<StubScorer>,
    pub storage: Arc<MemoryStorage>,
}

impl TestHarness {
    pub fn new(extractor: StubExtractor, scorer: StubScorer) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            extractor: Arc::new(extractor),
            scorer: Arc::new(scorer),
            storage: Arc::new(MemoryStorage::default()),
        }
    }

    pub fn with_extraction(value: Value) -> Self {
        Self::new(StubExtractor::returning(value), StubScorer::scoring(75.0))
    }

    pub fn state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            extractor: self.extractor.clone(),
            scorer: self.scorer.clone(),
            storage: self.storage.clone(),
        }
    }
}
