//! reminder-assistant: voice-driven reminder intake and recall.

mod config;
mod datetime;
mod dialogue;
mod fuzzy;
mod repeat;
mod speech;
mod store;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::speech::{ConsoleSurface, SpeechInput, SpeechOutput};

#[derive(Parser, Debug)]
#[command(name = "reminder-assistant", about = "Voice-driven reminder assistant")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reminder file path (overrides config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Process a single command, then exit
    #[arg(long)]
    once: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("reminder-assistant starting");

    let mut config = config::Config::load(args.config.as_deref());
    if let Some(path) = args.store {
        config.store.path = path;
    }
    info!("Reminder file: {}", config.store.path.display());

    let surface = Arc::new(ConsoleSurface::new(config.listen.retries));
    let assistant = Arc::new(dialogue::Assistant::new(
        surface.clone() as Arc<dyn SpeechInput>,
        surface as Arc<dyn SpeechOutput>,
        store::ReminderStore::new(&config.store.path),
        Box::new(datetime::PhraseResolver),
        config.dialogue.clone(),
    ));

    {
        let assistant = assistant.clone();
        tokio::task::spawn_blocking(move || assistant.greet()).await?;
    }

    // One blocking worker per command, awaited to completion so store
    // access is serialized across flows.
    loop {
        let assistant = assistant.clone();
        let outcome = tokio::task::spawn_blocking(move || assistant.run_command()).await?;
        if outcome == dialogue::CommandOutcome::Exit || args.once {
            break;
        }
    }

    info!("reminder-assistant stopped");
    Ok(())
}
