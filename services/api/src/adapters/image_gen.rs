//! services/api/src/adapters/image_gen.rs
//!
//! This module contains the adapter for OpenAI's image generation endpoint.
//! It implements the `ImageGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::images::{CreateImageRequestArgs, Image, ImageModel, ImageResponseFormat, ImageSize},
    Client,
};
use async_trait::async_trait;
use adventure_pack_core::{
    domain::PackImage,
    ports::{ImageGenerationService, PortError, PortResult},
};

const STYLE_SUFFIX: &str =
    "Colorful children's book illustration, warm lighting, no text, no logos.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ImageGenerationService` using the OpenAI Images API.
#[derive(Clone)]
pub struct OpenAiImageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiImageAdapter {
    /// Creates a new `OpenAiImageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// The hosted URL of a generated image, if the API returned one.
fn image_url(image: &Image) -> Option<String> {
    match image {
        Image::Url { url, .. } if !url.is_empty() => Some(url.clone()),
        _ => None,
    }
}

//=========================================================================================
// `ImageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerationService for OpenAiImageAdapter {
    async fn generate_image(&self, prompt: &str) -> PortResult<PackImage> {
        let request = CreateImageRequestArgs::default()
            .model(ImageModel::Other(self.model.clone()))
            .prompt(format!("{} {}", prompt, STYLE_SUFFIX))
            .n(1)
            .size(ImageSize::S1792x1024)
            .response_format(ImageResponseFormat::Url)
            .build()
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .images()
            .generate(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let url = response
            .data
            .iter()
            .find_map(|image| image_url(image))
            .ok_or_else(|| PortError::Unexpected("Image API returned no image URL.".to_string()))?;

        Ok(PackImage {
            url,
            prompt: prompt.to_string(),
        })
    }
}
