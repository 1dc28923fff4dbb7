//! services/api/src/adapters/demo.rs
//!
//! Offline implementations of the three provider ports. They return
//! deterministic content so the whole pipeline can run in development and in
//! tests without API keys.

use async_trait::async_trait;
use adventure_pack_core::{
    domain::{
        GeneratedAdventurePack, GenerationConstraints, ImageSearchResult, Mission, PackImage,
        WizardInput,
    },
    ports::{AdventureTextService, ImageGenerationService, ImageSearchService, PortResult},
};
use chrono::Utc;
use uuid::Uuid;

/// Lowercase ASCII slug used to build stable demo URLs.
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

//=========================================================================================
// Text
//=========================================================================================

#[derive(Clone, Default)]
pub struct DemoTextAdapter;

#[async_trait]
impl AdventureTextService for DemoTextAdapter {
    async fn generate_pack(
        &self,
        input: &WizardInput,
        _locale: &str,
        constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack> {
        let theme = input.adventure_type.as_str();
        let missions = (1..=constraints.phases)
            .map(|order| Mission {
                order,
                title: format!("Misión {}: la pista escondida", order),
                story: format!(
                    "Los exploradores encuentran la pista número {} de su aventura de {}.",
                    order, theme
                ),
                guide: format!(
                    "Esconde {} acertijos en la casa antes de empezar y entrega el primero al grupo.",
                    constraints.puzzles_per_phase
                ),
                success_condition: format!("El grupo resuelve los {} acertijos.", constraints.puzzles_per_phase),
            })
            .collect();

        Ok(GeneratedAdventurePack {
            id: Uuid::new_v4(),
            title: format!("La gran aventura de {}", input.occasion),
            image: PackImage {
                url: String::new(),
                prompt: format!("Niños explorando una aventura de {} en casa", theme),
            },
            duration_minutes: 20 * constraints.phases,
            ages: input.ages,
            participants: input.kids_count,
            difficulty: Some(input.difficulty),
            tone: Some(input.tone),
            adventure_type: Some(input.adventure_type),
            place: Some(input.place),
            materials: vec![
                "papel y lápices".to_string(),
                "cinta adhesiva".to_string(),
                "una caja para el tesoro".to_string(),
            ],
            introduction: "¡Bienvenidos, exploradores! Hoy empieza una misión muy especial."
                .to_string(),
            missions,
            conclusion: "¡Lo lograron! El tesoro es suyo.".to_string(),
            created_at: Utc::now(),
        })
    }
}

//=========================================================================================
// Search
//=========================================================================================

#[derive(Clone, Default)]
pub struct DemoSearchAdapter;

#[async_trait]
impl ImageSearchService for DemoSearchAdapter {
    async fn search(&self, query: &str) -> PortResult<Option<ImageSearchResult>> {
        let seed = slug(query);
        if seed.is_empty() {
            return Ok(None);
        }
        Ok(Some(ImageSearchResult {
            url: format!("https://picsum.photos/seed/{}/800/600", seed),
            prompt: query.to_string(),
            attribution: None,
        }))
    }
}

//=========================================================================================
// Image Generation
//=========================================================================================

#[derive(Clone, Default)]
pub struct DemoImageAdapter;

#[async_trait]
impl ImageGenerationService for DemoImageAdapter {
    async fn generate_image(&self, prompt: &str) -> PortResult<PackImage> {
        Ok(PackImage {
            url: format!(
                "https://placehold.co/800x600/2d6a4f/ffffff?text={}",
                slug(prompt).replace('-', "+")
            ),
            prompt: prompt.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_pack_core::domain::{AdventureType, AgeRange, Difficulty, Place, Tone};

    #[test]
    fn slug_keeps_ascii_words() {
        assert_eq!(slug("Space home  exciting!"), "space-home-exciting");
        assert_eq!(slug("selva mágica"), "selva-m-gica");
    }

    #[tokio::test]
    async fn demo_text_honours_constraints() {
        let input = WizardInput {
            occasion: "cumpleaños".to_string(),
            ages: AgeRange { min: 4, max: 7 },
            kids_count: 6,
            place: Place::Garden,
            adventure_type: AdventureType::Space,
            tone: Tone::Calm,
            difficulty: Difficulty::Easy,
        };

        let pack = DemoTextAdapter
            .generate_pack(&input, "es-ES", GenerationConstraints::standard())
            .await
            .unwrap();

        assert_eq!(pack.missions.len(), 3);
        assert!(!pack.image.prompt.is_empty());
        assert_eq!(pack.participants, 6);
    }

    #[tokio::test]
    async fn demo_search_is_deterministic() {
        let first = DemoSearchAdapter.search("space home").await.unwrap();
        let second = DemoSearchAdapter.search("space home").await.unwrap();

        assert_eq!(first, second);
        assert!(DemoSearchAdapter.search("¿¿").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn demo_generation_keeps_prompt() {
        let image = DemoImageAdapter.generate_image("Un castillo").await.unwrap();

        assert_eq!(image.prompt, "Un castillo");
        assert!(image.url.contains("un+castillo"));
    }
}
