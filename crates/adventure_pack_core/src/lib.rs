pub mod domain;
pub mod memory;
pub mod orchestrator;
pub mod ports;
pub mod query;

pub use domain::{
    reorder_missions, AdventureType, AgeRange, Attribution, CacheEntry, Difficulty,
    GeneratedAdventurePack, GenerationConstraints, GenerationResult, ImageSearchResult, Mission,
    PackImage, Place, Tone, WizardInput,
};
pub use memory::{InMemoryImageCache, DEFAULT_CACHE_TTL_HOURS};
pub use orchestrator::{MultimodalOrchestrator, PLACEHOLDER_IMAGE_URL};
pub use ports::{
    AdventureTextService, Clock, ImageCacheStore, ImageGenerationService, ImageSearchService,
    PortError, PortResult, SystemClock,
};
pub use query::build_search_query;
