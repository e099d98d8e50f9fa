use anyhow::Result;
use clap::{Parser, Subcommand};
use multimodal_bot::app::{App, Delivery};
use multimodal_bot::models::CapabilityRequest;
use multimodal_bot::voices::VoiceCatalog;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "multimodal-bot")]
#[command(about = "Chat, draw, speak and look at images through Gemini")]
struct CliArgs {
    /// Directory for generated media when no --out is given.
    #[arg(long, default_value = "output", global = true)]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a chat message.
    Chat { prompt: String },
    /// Generate an image from a text description.
    Image {
        #[arg(default_value = "")]
        prompt: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Convert text to speech (WAV).
    Speak {
        #[arg(long, value_parser = parse_voice_arg)]
        voice: String,
        text: String,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write the headerless PCM samples next to the WAV file.
        #[arg(long)]
        raw: bool,
    },
    /// Describe or answer a question about an image file.
    Analyze {
        path: PathBuf,
        #[arg(long, default_value = "")]
        question: String,
    },
    /// List available speech voices.
    Voices,
}

fn parse_voice_arg(input: &str) -> std::result::Result<String, String> {
    VoiceCatalog::validate(input)
        .map(str::to_string)
        .map_err(|_| {
            format!(
                "Invalid voice '{}'. Available voices are: {}",
                input,
                VoiceCatalog::names().join(", ")
            )
        })
}

struct Invocation {
    request: CapabilityRequest,
    out: Option<PathBuf>,
    raw: bool,
}

/// Maps a subcommand to a capability request; `None` for local-only commands.
async fn to_request(command: Command) -> Result<Option<Invocation>> {
    let (request, out, raw) = match command {
        Command::Chat { prompt } => (CapabilityRequest::Chat { prompt }, None, false),
        Command::Image { prompt, out } => (CapabilityRequest::ImageGenerate { prompt }, out, false),
        Command::Speak {
            voice,
            text,
            out,
            raw,
        } => (CapabilityRequest::SpeechSynthesize { text, voice }, out, raw),
        Command::Analyze { path, question } => {
            let image = tokio::fs::read(&path).await?;
            (CapabilityRequest::ImageAnalyze { image, question }, None, false)
        }
        Command::Voices => return Ok(None),
    };
    Ok(Some(Invocation { request, out, raw }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multimodal_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let Some(Invocation { request, out, raw }) = to_request(args.command).await? else {
        println!("{}", VoiceCatalog::names().join("\n"));
        return Ok(());
    };

    let app = match App::new(args.output_dir) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match app.handle(request, out).await {
        Ok(Delivery::Text(text)) => {
            println!("{}", text);
            Ok(())
        }
        Ok(Delivery::File { path, mime_type }) => {
            info!("Wrote {} to {}", mime_type, path.display());
            println!("{}", path.display());
            if raw {
                match app.write_raw_pcm(&path).await {
                    Ok(pcm_path) => println!("{}", pcm_path.display()),
                    Err(e) => {
                        error!("Failed to extract PCM from {}: {}", path.display(), e);
                        eprintln!("{}", e.user_message());
                        std::process::exit(1);
                    }
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
