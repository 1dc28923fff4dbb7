//! Shared mock collaborators for orchestrator tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use adventure_pack_core::{
    AdventureTextService, AdventureType, AgeRange, Attribution, CacheEntry, Clock, Difficulty,
    GeneratedAdventurePack, GenerationConstraints, ImageCacheStore, ImageGenerationService,
    ImageSearchResult, ImageSearchService, Mission, PackImage, Place, PortError, PortResult, Tone,
    WizardInput,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// The scenario input used throughout the orchestrator tests.
pub fn birthday_input() -> WizardInput {
    WizardInput {
        occasion: "birthday".to_string(),
        ages: AgeRange { min: 6, max: 10 },
        kids_count: 4,
        place: Place::Home,
        adventure_type: AdventureType::Adventure,
        tone: Tone::Exciting,
        difficulty: Difficulty::Medium,
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A clock that always returns a fixed point in time.
#[derive(Debug)]
pub struct FixedClock(pub Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(Mutex::new(time))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

//=========================================================================================
// Text provider
//=========================================================================================

/// Returns a fixed pack carrying the configured image prompt and records the
/// constraints it was called with.
pub struct StaticTextService {
    prompt: String,
    pub calls: Mutex<Vec<(String, GenerationConstraints)>>,
}

impl StaticTextService {
    pub fn with_prompt(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AdventureTextService for StaticTextService {
    async fn generate_pack(
        &self,
        input: &WizardInput,
        locale: &str,
        constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack> {
        self.calls
            .lock()
            .unwrap()
            .push((locale.to_string(), constraints));
        Ok(GeneratedAdventurePack {
            id: Uuid::new_v4(),
            title: "La selva mágica".to_string(),
            image: PackImage {
                url: "https://provider.example/draft.png".to_string(),
                prompt: self.prompt.clone(),
            },
            duration_minutes: 60,
            ages: input.ages,
            participants: input.kids_count,
            difficulty: Some(input.difficulty),
            tone: Some(input.tone),
            adventure_type: Some(input.adventure_type),
            place: Some(input.place),
            materials: vec!["linterna".to_string()],
            introduction: "Había una vez...".to_string(),
            missions: (1..=constraints.phases)
                .map(|order| Mission {
                    order,
                    title: format!("Misión {}", order),
                    story: String::new(),
                    guide: String::new(),
                    success_condition: String::new(),
                })
                .collect(),
            conclusion: "Fin".to_string(),
            created_at: fixed_time(),
        })
    }
}

pub struct FailingTextService;

#[async_trait]
impl AdventureTextService for FailingTextService {
    async fn generate_pack(
        &self,
        _input: &WizardInput,
        _locale: &str,
        _constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack> {
        Err(PortError::Unexpected("model unavailable".to_string()))
    }
}

//=========================================================================================
// Image search
//=========================================================================================

pub enum SearchBehavior {
    Found(ImageSearchResult),
    Empty,
    Fails(String),
}

pub struct RecordingSearch {
    behavior: SearchBehavior,
    pub queries: Mutex<Vec<String>>,
}

impl RecordingSearch {
    pub fn new(behavior: SearchBehavior) -> Self {
        Self {
            behavior,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn found(url: &str, photographer: Option<&str>) -> Self {
        Self::new(SearchBehavior::Found(ImageSearchResult {
            url: url.to_string(),
            prompt: "ignored".to_string(),
            attribution: photographer.map(|name| Attribution {
                photographer: name.to_string(),
                source_url: "https://unsplash.com/@someone".to_string(),
            }),
        }))
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageSearchService for RecordingSearch {
    async fn search(&self, query: &str) -> PortResult<Option<ImageSearchResult>> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.behavior {
            SearchBehavior::Found(result) => Ok(Some(result.clone())),
            SearchBehavior::Empty => Ok(None),
            SearchBehavior::Fails(message) => Err(PortError::Unexpected(message.clone())),
        }
    }
}

//=========================================================================================
// Image generation
//=========================================================================================

pub struct RecordingGenerator {
    fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerationService for RecordingGenerator {
    async fn generate_image(&self, prompt: &str) -> PortResult<PackImage> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(PortError::Unexpected("quota exceeded".to_string()));
        }
        Ok(PackImage {
            url: "https://images.example/generated.png".to_string(),
            prompt: prompt.to_string(),
        })
    }
}

//=========================================================================================
// Cache
//=========================================================================================

/// A cache that serves one optional pre-seeded entry and records every call.
pub struct RecordingCache {
    seeded: Option<CacheEntry>,
    pub gets: AtomicUsize,
    pub sets: Mutex<Vec<CacheEntry>>,
}

impl RecordingCache {
    pub fn empty() -> Self {
        Self {
            seeded: None,
            gets: AtomicUsize::new(0),
            sets: Mutex::new(Vec::new()),
        }
    }

    pub fn seeded(entry: CacheEntry) -> Self {
        Self {
            seeded: Some(entry),
            ..Self::empty()
        }
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<CacheEntry> {
        self.sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageCacheStore for RecordingCache {
    async fn get(&self, query: &str) -> Option<CacheEntry> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.seeded.clone().filter(|entry| entry.query == query)
    }

    async fn set(&self, entry: CacheEntry) {
        self.sets.lock().unwrap().push(entry);
    }

    async fn expire(&self, _ttl_hours: u32) -> PortResult<u64> {
        Ok(0)
    }
}

/// A cache whose backend is unreachable: every read misses and every write is
/// lost, the way the real stores degrade.
#[derive(Default)]
pub struct FaultyCache {
    pub gets: AtomicUsize,
    pub dropped_writes: AtomicUsize,
}

impl FaultyCache {
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn dropped_write_count(&self) -> usize {
        self.dropped_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageCacheStore for FaultyCache {
    async fn get(&self, _query: &str) -> Option<CacheEntry> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        None
    }

    async fn set(&self, _entry: CacheEntry) {
        self.dropped_writes.fetch_add(1, Ordering::SeqCst);
    }

    async fn expire(&self, _ttl_hours: u32) -> PortResult<u64> {
        Err(PortError::Unexpected("cache backend unreachable".to_string()))
    }
}
