pub mod demo;
mod http;
pub mod image_cache;
pub mod image_gen;
pub mod image_search;
pub mod text_llm;

pub use demo::{DemoImageAdapter, DemoSearchAdapter, DemoTextAdapter};
pub use image_cache::PgImageCache;
pub use image_gen::OpenAiImageAdapter;
pub use image_search::UnsplashSearchAdapter;
pub use text_llm::OpenAiTextAdapter;
