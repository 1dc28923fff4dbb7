//! crates/adventure_pack_core/src/domain.rs
//!
//! Defines the core data structures for adventure pack generation.
//! Field names serialize in camelCase because `GenerationResult` is the JSON
//! contract handed to the rest of the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::{PortError, PortResult};

//=========================================================================================
// Wizard Input
//=========================================================================================

/// Inclusive age range of the participating children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    Home,
    Garden,
    Park,
    Classroom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdventureType {
    Adventure,
    Mystery,
    Fantasy,
    Science,
    Pirates,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Exciting,
    Funny,
    Mysterious,
    Calm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Place {
    pub fn as_str(&self) -> &'static str {
        match self {
            Place::Home => "home",
            Place::Garden => "garden",
            Place::Park => "park",
            Place::Classroom => "classroom",
        }
    }
}

impl AdventureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdventureType::Adventure => "adventure",
            AdventureType::Mystery => "mystery",
            AdventureType::Fantasy => "fantasy",
            AdventureType::Science => "science",
            AdventureType::Pirates => "pirates",
            AdventureType::Space => "space",
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Exciting => "exciting",
            Tone::Funny => "funny",
            Tone::Mysterious => "mysterious",
            Tone::Calm => "calm",
        }
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// The answers a parent gives in the wizard. Validation happens before this
/// reaches the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardInput {
    pub occasion: String,
    pub ages: AgeRange,
    pub kids_count: u32,
    pub place: Place,
    pub adventure_type: AdventureType,
    pub tone: Tone,
    pub difficulty: Difficulty,
}

/// Fixed shape constraints passed to the text provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConstraints {
    pub phases: u32,
    pub puzzles_per_phase: u32,
    pub screen_free: bool,
}

impl GenerationConstraints {
    /// Three missions, two puzzle slots each, no screens.
    pub fn standard() -> Self {
        Self {
            phases: 3,
            puzzles_per_phase: 2,
            screen_free: true,
        }
    }
}

//=========================================================================================
// Generated Pack
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackImage {
    pub url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub order: u32,
    pub title: String,
    pub story: String,
    pub guide: String,
    pub success_condition: String,
}

/// The complete bundle produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAdventurePack {
    pub id: Uuid,
    pub title: String,
    pub image: PackImage,
    pub duration_minutes: u32,
    pub ages: AgeRange,
    pub participants: u32,
    pub difficulty: Option<Difficulty>,
    pub tone: Option<Tone>,
    pub adventure_type: Option<AdventureType>,
    pub place: Option<Place>,
    pub materials: Vec<String>,
    pub introduction: String,
    pub missions: Vec<Mission>,
    pub conclusion: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Image Search and Cache
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub photographer: String,
    pub source_url: String,
}

/// One hit from a stock-photo search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResult {
    pub url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
}

/// A previously resolved search, keyed uniquely by `query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub query: String,
    pub url: String,
    pub photographer: Option<String>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Rebuilds the search result a cached entry was created from.
    pub fn to_search_result(&self) -> ImageSearchResult {
        let attribution = self.photographer.as_ref().map(|photographer| Attribution {
            photographer: photographer.clone(),
            source_url: self.source_url.clone().unwrap_or_default(),
        });
        ImageSearchResult {
            url: self.url.clone(),
            prompt: self.query.clone(),
            attribution,
        }
    }
}

//=========================================================================================
// Generation Result
//=========================================================================================

/// The only two shapes a caller ever sees: a complete pack (maybe with
/// warnings) or a top-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack: Option<GeneratedAdventurePack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(pack: GeneratedAdventurePack, warnings: Vec<String>) -> Self {
        Self {
            ok: true,
            pack: Some(pack),
            warnings: if warnings.is_empty() { None } else { Some(warnings) },
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            pack: None,
            warnings: None,
            error: Some(message.into()),
        }
    }
}

//=========================================================================================
// Mission Reordering
//=========================================================================================

/// Rearranges missions so they follow `order` (a permutation of the current
/// mission numbers), then renumbers them from 1. The pack is left untouched
/// when `order` is not a permutation.
pub fn reorder_missions(pack: &mut GeneratedAdventurePack, order: &[u32]) -> PortResult<()> {
    let mut current: Vec<u32> = pack.missions.iter().map(|m| m.order).collect();
    let mut requested = order.to_vec();
    current.sort_unstable();
    requested.sort_unstable();
    if current != requested {
        return Err(PortError::Validation(format!(
            "Mission order {:?} is not a permutation of {:?}",
            order, current
        )));
    }

    let mut remaining = std::mem::take(&mut pack.missions);
    let mut reordered = Vec::with_capacity(remaining.len());
    for number in order {
        if let Some(pos) = remaining.iter().position(|m| m.order == *number) {
            reordered.push(remaining.remove(pos));
        }
    }

    for (index, mission) in reordered.iter_mut().enumerate() {
        mission.order = index as u32 + 1;
    }
    pack.missions = reordered;
    Ok(())
}
