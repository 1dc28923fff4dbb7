//! services/api/src/adapters/text_llm.rs
//!
//! This module contains the adapter for the adventure-writing LLM.
//! It implements the `AdventureTextService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You write screen-free adventure packs that parents run at home for a group of children.

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "title": string,
  "durationMinutes": integer,
  "materials": [string],
  "introduction": string,
  "missions": [
    { "title": string, "story": string, "guide": string, "successCondition": string }
  ],
  "conclusion": string,
  "imagePrompt": string
}

Rules:
- "story" is read aloud to the children; "guide" is for the adult running the mission and explains how to prepare and run its puzzles.
- "successCondition" is one sentence the adult can check to know the mission is complete.
- Materials must be common household items. No screens, phones or tablets anywhere.
- "imagePrompt" is a short visual description of a cover illustration for the adventure, never empty.
- Write every value in the requested language."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use adventure_pack_core::{
    domain::{GeneratedAdventurePack, GenerationConstraints, Mission, PackImage, WizardInput},
    ports::{AdventureTextService, PortError, PortResult},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// LLM Reply Shape
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmPack {
    title: String,
    #[serde(default)]
    duration_minutes: u32,
    #[serde(default)]
    materials: Vec<String>,
    introduction: String,
    missions: Vec<LlmMission>,
    conclusion: String,
    #[serde(default)]
    image_prompt: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmMission {
    title: String,
    story: String,
    guide: String,
    success_condition: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AdventureTextService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTextAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTextAdapter {
    /// Creates a new `OpenAiTextAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Builds the user message describing one wizard submission.
pub(crate) fn build_user_prompt(
    input: &WizardInput,
    locale: &str,
    constraints: GenerationConstraints,
) -> String {
    format!(
        "Language: {locale}\n\
         Occasion: {occasion}\n\
         Children: {kids}, aged {min} to {max}\n\
         Place: {place}\n\
         Adventure type: {kind}\n\
         Tone: {tone}\n\
         Difficulty: {difficulty}\n\
         Write exactly {phases} missions with {puzzles} puzzles each.{screen_free}",
        occasion = input.occasion,
        kids = input.kids_count,
        min = input.ages.min,
        max = input.ages.max,
        place = input.place.as_str(),
        kind = input.adventure_type.as_str(),
        tone = input.tone.as_str(),
        difficulty = input.difficulty.as_str(),
        phases = constraints.phases,
        puzzles = constraints.puzzles_per_phase,
        screen_free = if constraints.screen_free {
            " The whole activity must be screen-free."
        } else {
            ""
        },
    )
}

/// Turns the raw model reply into a pack. Tolerates a fenced code block
/// around the JSON.
pub(crate) fn parse_pack(raw: &str, input: &WizardInput) -> PortResult<GeneratedAdventurePack> {
    let body = raw.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(body)
        .trim();

    let reply: LlmPack = serde_json::from_str(body)
        .map_err(|e| PortError::Unexpected(format!("Adventure LLM returned invalid JSON: {}", e)))?;

    if reply.image_prompt.trim().is_empty() {
        return Err(PortError::Unexpected(
            "Adventure LLM response contained no image prompt.".to_string(),
        ));
    }
    if reply.missions.is_empty() {
        return Err(PortError::Unexpected(
            "Adventure LLM response contained no missions.".to_string(),
        ));
    }

    let missions = reply
        .missions
        .into_iter()
        .enumerate()
        .map(|(index, m)| Mission {
            order: index as u32 + 1,
            title: m.title,
            story: m.story,
            guide: m.guide,
            success_condition: m.success_condition,
        })
        .collect();

    Ok(GeneratedAdventurePack {
        id: Uuid::new_v4(),
        title: reply.title,
        image: PackImage {
            url: String::new(),
            prompt: reply.image_prompt.trim().to_string(),
        },
        duration_minutes: reply.duration_minutes,
        ages: input.ages,
        participants: input.kids_count,
        difficulty: Some(input.difficulty),
        tone: Some(input.tone),
        adventure_type: Some(input.adventure_type),
        place: Some(input.place),
        materials: reply.materials,
        introduction: reply.introduction,
        missions,
        conclusion: reply.conclusion,
        created_at: Utc::now(),
    })
}

//=========================================================================================
// `AdventureTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AdventureTextService for OpenAiTextAdapter {
    async fn generate_pack(
        &self,
        input: &WizardInput,
        locale: &str,
        constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(build_user_prompt(input, locale, constraints))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .temperature(0.8)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Adventure LLM returned no text content.".to_string())
            })?;

        debug!(chars = content.len(), "adventure LLM replied");
        parse_pack(&content, input)
    }
}
