//! In-memory fakes for the pipeline's external collaborators.
//! Each records its calls so tests can assert which stages ran.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextGenerator};
use crate::models::profile::{
    EducationEntry, MasterResumeProfile, PersonalInfo, ResumeContent, StoredResume,
    WorkExperienceEntry,
};
use crate::profile::{ProfileStore, ProfileStoreError};
use crate::render::{PdfCompositor, RenderError};
use crate::storage::{ObjectStore, StorageError};

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n% fake\n";

/// A fully populated profile with `history_len` prior resumes.
pub fn sample_profile(history_len: usize) -> MasterResumeProfile {
    let user_id = Uuid::new_v4();
    MasterResumeProfile {
        user_id,
        content: ResumeContent {
            personal_info: PersonalInfo {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0000".to_string(),
                location: "London".to_string(),
                linkedin: "linkedin.com/in/ada".to_string(),
                github: "github.com/ada".to_string(),
                website: "ada.dev".to_string(),
            },
            career_summary: "Backend engineer building data-heavy services in Rust.".to_string(),
            education: vec![EducationEntry {
                institution: "University of London".to_string(),
                degree: "BSc".to_string(),
                field_of_study: "Mathematics".to_string(),
                location: "London".to_string(),
                start_date: "2012".to_string(),
                end_date: "2015".to_string(),
                highlights: vec!["First-class honours".to_string()],
            }],
            work_experience: vec![WorkExperienceEntry {
                company: "Analytical Engines Ltd".to_string(),
                role: "Senior Engineer".to_string(),
                location: "Remote".to_string(),
                start_date: "2019".to_string(),
                end_date: "Present".to_string(),
                responsibilities: vec![
                    "Built an event ingestion service handling 2M events per day".to_string(),
                    "Cut p99 latency by 40% by moving hot paths to async Rust".to_string(),
                ],
            }],
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string(), "AWS".to_string()],
            achievements: vec!["Speaker at RustConf".to_string()],
            volunteer: vec!["Mentor at Code First Girls".to_string()],
        },
        stored_resumes: (1..=history_len)
            .map(|n| StoredResume::numbered(n, format!("https://cdn.test/resumes/{user_id}/{n}.pdf")))
            .collect(),
    }
}

/// A model reply wrapping `content` in a single fenced JSON block.
pub fn fenced_reply(content: &ResumeContent) -> String {
    format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(content).unwrap()
    )
}

// ── Profile store ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<Uuid, MasterResumeProfile>>,
    fail_appends: AtomicBool,
    reads: AtomicUsize,
    append_attempts: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn insert(&self, profile: MasterResumeProfile) -> MasterResumeProfile {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        profile
    }

    pub fn remove(&self, user_id: Uuid) {
        self.profiles.lock().unwrap().remove(&user_id);
    }

    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn append_attempts(&self) -> usize {
        self.append_attempts.load(Ordering::SeqCst)
    }

    pub fn history_len(&self, user_id: Uuid) -> usize {
        self.profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|p| p.stored_resumes.len())
            .unwrap_or(0)
    }

    pub fn get(&self, user_id: Uuid) -> Option<MasterResumeProfile> {
        self.profiles.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn read_profile(&self, user_id: Uuid) -> Result<MasterResumeProfile, ProfileStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.get(user_id).ok_or(ProfileStoreError::NotFound(user_id))
    }

    async fn append_resume_history(
        &self,
        user_id: Uuid,
        link: &str,
    ) -> Result<MasterResumeProfile, ProfileStoreError> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(ProfileStoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&user_id)
            .ok_or(ProfileStoreError::NotFound(user_id))?;
        let entry = StoredResume::numbered(profile.stored_resumes.len() + 1, link);
        profile.stored_resumes.push(entry);
        Ok(profile.clone())
    }
}

// ── Generative service ──────────────────────────────────────────────────────

pub enum GeneratorBehaviour {
    Reply(String),
    Fail,
    Hang,
}

pub struct FakeGenerator {
    behaviour: GeneratorBehaviour,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with(GeneratorBehaviour::Reply(reply.into()))
    }

    pub fn with(behaviour: GeneratorBehaviour) -> Self {
        Self {
            behaviour,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behaviour {
            GeneratorBehaviour::Reply(reply) => Ok(reply.clone()),
            GeneratorBehaviour::Fail => Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            }),
            GeneratorBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::EmptyContent)
            }
        }
    }
}

// ── PDF compositor ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeCompositor {
    fail: bool,
    documents: Mutex<Vec<String>>,
}

impl FakeCompositor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn last_document(&self) -> Option<String> {
        self.documents.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PdfCompositor for FakeCompositor {
    async fn compose(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.documents.lock().unwrap().push(html.to_string());
        if self.fail {
            return Err(RenderError::EngineFailed {
                status: "exit status: 1".to_string(),
                stderr: "crashed".to_string(),
            });
        }
        Ok(FAKE_PDF.to_vec())
    }
}

// ── Object store ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Upload {
    pub key: String,
    pub content_type: String,
    pub bytes: Bytes,
}

type PutHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct FakeObjectStore {
    fail: bool,
    /// Runs after a successful put, to interleave other work with the pipeline.
    after_put: Option<PutHook>,
    uploads: Mutex<Vec<Upload>>,
    attempts: AtomicUsize,
}

impl FakeObjectStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn after_put(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            after_put: Some(Box::new(hook)),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(
        &self,
        bytes: Bytes,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                message: "bucket unavailable".to_string(),
            });
        }
        self.uploads.lock().unwrap().push(Upload {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        if let Some(hook) = &self.after_put {
            hook();
        }
        Ok(format!("https://cdn.test/{key}"))
    }
}

/// Convenience bundle of fakes wired the way `main` wires the real services.
pub struct Harness {
    pub profiles: Arc<InMemoryProfileStore>,
    pub generator: Arc<FakeGenerator>,
    pub compositor: Arc<FakeCompositor>,
    pub store: Arc<FakeObjectStore>,
}

impl Harness {
    pub fn new(generator: FakeGenerator) -> Self {
        Self {
            profiles: Arc::new(InMemoryProfileStore::default()),
            generator: Arc::new(generator),
            compositor: Arc::new(FakeCompositor::default()),
            store: Arc::new(FakeObjectStore::default()),
        }
    }

    pub fn with_compositor(mut self, compositor: FakeCompositor) -> Self {
        self.compositor = Arc::new(compositor);
        self
    }

    pub fn with_store(mut self, store: FakeObjectStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn pipeline(&self) -> crate::tailoring::pipeline::TailoringPipeline {
        crate::tailoring::pipeline::TailoringPipeline::new(
            self.profiles.clone(),
            self.generator.clone(),
            crate::render::ResumeRenderer::new().unwrap(),
            self.compositor.clone(),
            self.store.clone(),
            crate::tailoring::pipeline::StageTimeouts::uniform(Duration::from_secs(30)),
        )
    }
}
