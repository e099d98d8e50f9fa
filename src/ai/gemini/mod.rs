pub mod chat;
pub mod client;
pub mod image;
pub mod speech;
pub mod types;
pub mod vision;

pub use chat::GeminiChatClient;
pub use client::GeminiHttpClient;
pub use image::{GeminiImageClient, GeneratedImage};
pub use speech::GeminiSpeechClient;
pub use vision::GeminiVisionClient;
