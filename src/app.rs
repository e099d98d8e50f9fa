//! Command handling for the bot front end.
//!
//! Turns a user command into a capability request, runs it, and delivers the
//! result: text is returned for printing/replying, media is written to disk.

use crate::ai::{CapabilityService, GeminiClient};
use crate::audio::wav_to_pcm;
use crate::models::{Artifact, CapabilityRequest, Config};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

/// What the transport should send back to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Text(String),
    File { path: PathBuf, mime_type: String },
}

pub struct App {
    service: Box<dyn CapabilityService>,
    output_dir: PathBuf,
}

impl App {
    /// Build an app around any capability backend (mocks in tests).
    pub fn with_service(service: Box<dyn CapabilityService>, output_dir: PathBuf) -> Self {
        Self {
            service,
            output_dir,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::with_service(
            Box::new(GeminiClient::new(&config)),
            output_dir,
        ))
    }

    /// Runs `request` and delivers its artifact, writing media to `out`
    /// (or a generated name in the output directory).
    pub async fn handle(&self, request: CapabilityRequest, out: Option<PathBuf>) -> Result<Delivery> {
        let capability = request.name();
        info!("[{}] Handling request", capability);

        let artifact = self.service.execute(&request).await.map_err(|e| {
            error!("[{}] Request failed ({:?}): {}", capability, e.kind(), e);
            e
        })?;

        let extension = artifact.file_extension();
        let (bytes, mime_type) = match artifact {
            Artifact::Text(text) => return Ok(Delivery::Text(text)),
            Artifact::Image { bytes, mime_type } | Artifact::Audio { bytes, mime_type } => {
                (bytes, mime_type)
            }
        };

        let path = out.unwrap_or_else(|| self.default_path(capability, extension));
        self.save(&path, &bytes).await?;
        Ok(Delivery::File { path, mime_type })
    }

    fn default_path(&self, capability: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.{}", capability, Uuid::new_v4(), extension))
    }

    /// Strips the WAV header from a saved speech file and writes the bare PCM
    /// samples next to it with a `.pcm` extension.
    pub async fn write_raw_pcm(&self, wav_path: &Path) -> Result<PathBuf> {
        let wav = tokio::fs::read(wav_path).await?;
        let (header, pcm) = wav_to_pcm(&wav)?;
        info!(
            "Extracted {} bytes of {} Hz PCM from {}",
            pcm.len(),
            header.sample_rate,
            wav_path.display()
        );

        let path = wav_path.with_extension("pcm");
        self.save(&path, pcm).await?;
        Ok(path)
    }

    async fn save(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockCapabilityClient;
    use crate::error::FailureKind;
    use crate::Error;
    use tempfile::tempdir;

    fn build_app(mock: MockCapabilityClient, output_dir: &Path) -> App {
        App::with_service(Box::new(mock), output_dir.to_path_buf())
    }

    #[tokio::test]
    async fn test_chat_is_delivered_as_text() {
        let dir = tempdir().unwrap();
        let app = build_app(
            MockCapabilityClient::new().with_chat_response("Hello!".to_string()),
            dir.path(),
        );

        let delivery = app
            .handle(
                CapabilityRequest::Chat {
                    prompt: "hi".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(delivery, Delivery::Text("Hello!".to_string()));
    }

    #[tokio::test]
    async fn test_image_is_written_to_generated_path() {
        let dir = tempdir().unwrap();
        let app = build_app(
            MockCapabilityClient::new().with_image_response(vec![1, 2, 3]),
            dir.path(),
        );

        let delivery = app
            .handle(
                CapabilityRequest::ImageGenerate {
                    prompt: "a cabin".to_string(),
                },
                None,
            )
            .await
            .unwrap();

        match delivery {
            Delivery::File { path, mime_type } => {
                assert_eq!(mime_type, "image/png");
                assert!(path.starts_with(dir.path()));
                assert!(path.to_string_lossy().ends_with(".png"));
                assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_speech_is_written_to_requested_path() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("hello.wav");
        let app = build_app(MockCapabilityClient::new(), dir.path());

        let delivery = app
            .handle(
                CapabilityRequest::SpeechSynthesize {
                    text: "Hello".to_string(),
                    voice: "Kore".to_string(),
                },
                Some(out.clone()),
            )
            .await
            .unwrap();

        assert_eq!(
            delivery,
            Delivery::File {
                path: out.clone(),
                mime_type: "audio/wav".to_string()
            }
        );
        let wav = std::fs::read(&out).unwrap();
        let (header, pcm) = wav_to_pcm(&wav).unwrap();
        assert_eq!(header.sample_rate, 24_000);
        assert_eq!(pcm.len(), 10);
    }

    #[tokio::test]
    async fn test_failures_propagate_without_writing_files() {
        let dir = tempdir().unwrap();
        let mock = MockCapabilityClient::new()
            .with_failure(Error::ProviderRejected("blocked".to_string()));
        let observer = mock.clone();
        let app = build_app(mock, dir.path());

        let err = app
            .handle(
                CapabilityRequest::ImageGenerate {
                    prompt: "x".to_string(),
                },
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::ProviderRejected);
        assert_eq!(observer.get_call_count(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_raw_pcm_is_written_beside_the_wav() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("hello.wav");
        let app = build_app(MockCapabilityClient::new(), dir.path());

        app.handle(
            CapabilityRequest::SpeechSynthesize {
                text: "Hi".to_string(),
                voice: "Kore".to_string(),
            },
            Some(out.clone()),
        )
        .await
        .unwrap();

        let raw = app.write_raw_pcm(&out).await.unwrap();
        assert_eq!(raw, dir.path().join("hello.pcm"));
        assert_eq!(std::fs::read(&raw).unwrap(), vec![0u8; 4]);
    }

    #[tokio::test]
    async fn test_raw_pcm_rejects_non_wav_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-audio.wav");
        std::fs::write(&path, b"plain text").unwrap();
        let app = build_app(MockCapabilityClient::new(), dir.path());

        let err = app.write_raw_pcm(&path).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert!(!dir.path().join("not-audio.pcm").exists());
    }
}
