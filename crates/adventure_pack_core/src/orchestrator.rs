//! crates/adventure_pack_core/src/orchestrator.rs
//!
//! Turns a wizard input into a complete, image-bearing adventure pack by
//! sequencing the text provider, the cached stock-photo search, AI image
//! generation and finally a static placeholder.
//!
//! Every step runs strictly after the previous one: generation must know the
//! definitive outcome of the search before spending a paid call. Only the text
//! step is fatal; every image step degrades into a warning.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{
    CacheEntry, GeneratedAdventurePack, GenerationConstraints, GenerationResult, PackImage,
    WizardInput,
};
use crate::ports::{
    AdventureTextService, Clock, ImageCacheStore, ImageGenerationService, ImageSearchService,
    SystemClock,
};
use crate::query::build_search_query;

/// Image used when neither search nor generation produced anything usable.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/800x600/1a1a1a/ffffff?text=Imagen+No+Disponible";

/// Prompt recorded on the placeholder when the pack carried none.
pub const NO_PROMPT_AVAILABLE: &str = "sin prompt disponible";

pub const DEFAULT_LOCALE: &str = "es-ES";

//=========================================================================================
// Image Fallback Chain
//=========================================================================================

/// Mutable state shared by the stages of one image acquisition.
struct Attempt<'a> {
    pack: &'a GeneratedAdventurePack,
    search_attempted: bool,
    warnings: Vec<String>,
}

/// One candidate source of a cover image.
enum ImageStage<'a> {
    Search {
        search: &'a dyn ImageSearchService,
        cache: Option<&'a dyn ImageCacheStore>,
        clock: &'a dyn Clock,
    },
    Generation {
        generator: &'a dyn ImageGenerationService,
    },
}

impl ImageStage<'_> {
    async fn acquire(&self, attempt: &mut Attempt<'_>) -> Option<PackImage> {
        match self {
            ImageStage::Search {
                search,
                cache,
                clock,
            } => search_stage(*search, *cache, *clock, attempt).await,
            ImageStage::Generation { generator } => generation_stage(*generator, attempt).await,
        }
    }
}

/// Ordered list of image stages evaluated until the first one resolves.
struct FallbackChain<'a> {
    stages: Vec<ImageStage<'a>>,
}

impl FallbackChain<'_> {
    async fn resolve(&self, attempt: &mut Attempt<'_>) -> Option<PackImage> {
        for stage in &self.stages {
            if let Some(image) = stage.acquire(attempt).await {
                return Some(image);
            }
        }
        None
    }
}

async fn search_stage(
    search: &dyn ImageSearchService,
    cache: Option<&dyn ImageCacheStore>,
    clock: &dyn Clock,
    attempt: &mut Attempt<'_>,
) -> Option<PackImage> {
    attempt.search_attempted = true;
    let query = build_search_query(attempt.pack);

    let cached = match cache {
        Some(cache) => cache.get(&query).await,
        None => None,
    };

    let (result, from_cache) = match cached {
        Some(entry) => {
            debug!(%query, "image cache hit");
            (entry.to_search_result(), true)
        }
        None => match search.search(&query).await {
            Ok(Some(result)) if !result.url.is_empty() => (result, false),
            Ok(_) => {
                info!(%query, "image search returned no results");
                attempt.warnings.push(format!(
                    "La búsqueda de imágenes no devolvió resultados para \"{}\"",
                    query
                ));
                return None;
            }
            Err(e) => {
                warn!(%query, error = %e, "image search failed");
                attempt
                    .warnings
                    .push(format!("La búsqueda de imágenes falló: {}", e));
                return None;
            }
        },
    };

    if !from_cache {
        if let Some(cache) = cache {
            let attribution = result.attribution.as_ref();
            cache
                .set(CacheEntry {
                    query: query.clone(),
                    url: result.url.clone(),
                    photographer: attribution.map(|a| a.photographer.clone()),
                    source_url: attribution.map(|a| a.source_url.clone()),
                    created_at: clock.now(),
                })
                .await;
        }
    }

    if let Some(attribution) = &result.attribution {
        let warning = if attribution.source_url.is_empty() {
            format!("Foto de {}", attribution.photographer)
        } else {
            format!(
                "Foto de {} en {}",
                attribution.photographer, attribution.source_url
            )
        };
        attempt.warnings.push(warning);
    }

    Some(PackImage {
        url: result.url,
        prompt: query,
    })
}

async fn generation_stage(
    generator: &dyn ImageGenerationService,
    attempt: &mut Attempt<'_>,
) -> Option<PackImage> {
    let prompt = attempt.pack.image.prompt.trim();
    if prompt.is_empty() {
        return None;
    }

    match generator.generate_image(prompt).await {
        Ok(mut image) if !image.url.is_empty() => {
            if image.prompt.is_empty() {
                image.prompt = prompt.to_string();
            }
            if attempt.search_attempted {
                attempt
                    .warnings
                    .push("Imagen generada con IA como alternativa a la búsqueda".to_string());
            }
            Some(image)
        }
        Ok(_) => {
            warn!("image generation returned an empty URL");
            attempt
                .warnings
                .push("La generación de imagen falló: respuesta sin URL".to_string());
            None
        }
        Err(e) => {
            warn!(error = %e, "image generation failed");
            attempt
                .warnings
                .push(format!("La generación de imagen falló: {}", e));
            None
        }
    }
}

//=========================================================================================
// Orchestrator
//=========================================================================================

/// Coordinates the providers behind a single `generate` call.
#[derive(Clone)]
pub struct MultimodalOrchestrator {
    text: Arc<dyn AdventureTextService>,
    search: Option<Arc<dyn ImageSearchService>>,
    cache: Option<Arc<dyn ImageCacheStore>>,
    image_generation: Option<Arc<dyn ImageGenerationService>>,
    locale: String,
    clock: Arc<dyn Clock>,
}

impl MultimodalOrchestrator {
    /// Creates an orchestrator with only the mandatory text provider.
    pub fn new(text: Arc<dyn AdventureTextService>) -> Self {
        Self {
            text,
            search: None,
            cache: None,
            image_generation: None,
            locale: DEFAULT_LOCALE.to_string(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn ImageSearchService>) -> Self {
        self.search = Some(search);
        self
    }

    /// The cache is only consulted when a search provider is also present.
    pub fn with_cache(mut self, cache: Arc<dyn ImageCacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_image_generation(mut self, generator: Arc<dyn ImageGenerationService>) -> Self {
        self.image_generation = Some(generator);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Search always precedes generation: a free stock photo is preferred
    /// over a paid generative call.
    fn image_chain(&self) -> FallbackChain<'_> {
        let mut stages = Vec::with_capacity(2);
        if let Some(search) = &self.search {
            stages.push(ImageStage::Search {
                search: search.as_ref(),
                cache: self.cache.as_deref(),
                clock: self.clock.as_ref(),
            });
        }
        if let Some(generator) = &self.image_generation {
            stages.push(ImageStage::Generation {
                generator: generator.as_ref(),
            });
        }
        FallbackChain { stages }
    }

    /// Generates a pack that always carries a usable image, or a top-level
    /// error when the narrative itself could not be produced.
    pub async fn generate(&self, input: &WizardInput) -> GenerationResult {
        info!(occasion = %input.occasion, locale = %self.locale, "generating adventure pack");

        let mut pack = match self
            .text
            .generate_pack(input, &self.locale, GenerationConstraints::standard())
            .await
        {
            Ok(pack) => pack,
            Err(e) => {
                error!(error = %e, "adventure text generation failed");
                return GenerationResult::failure(format!(
                    "No se pudo generar la aventura: {}",
                    e
                ));
            }
        };

        let mut attempt = Attempt {
            pack: &pack,
            search_attempted: false,
            warnings: Vec::new(),
        };
        let resolved = self.image_chain().resolve(&mut attempt).await;
        let mut warnings = attempt.warnings;

        match resolved {
            Some(image) if !image.url.is_empty() => pack.image = image,
            _ => {
                let prompt = if pack.image.prompt.trim().is_empty() {
                    NO_PROMPT_AVAILABLE.to_string()
                } else {
                    pack.image.prompt.clone()
                };
                pack.image = PackImage {
                    url: PLACEHOLDER_IMAGE_URL.to_string(),
                    prompt,
                };
                warnings.push("No se pudo obtener imagen; se usa una imagen genérica".to_string());
            }
        }

        info!(pack_id = %pack.id, warnings = warnings.len(), "adventure pack ready");
        GenerationResult::success(pack, warnings)
    }
}
