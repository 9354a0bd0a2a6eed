mod app;
mod config;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Command};
use mq_core::Identity;
use storage::JsonFileStore;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr so they never interleave with prompts on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "math_quiz=warn,mq_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let identity = Identity::new(&cli.user);
    let mut store = JsonFileStore::open(cli.data_dir.clone()).context("opening history store")?;
    tracing::debug!(user = %identity.user_id, path = %store.path().display(), "history store ready");

    let mut rng = rand::thread_rng();
    let mut term = app::Terminal::new();

    match cli.command {
        Command::Quiz(args) => {
            let settings = args.settings(cli.symbols)?;
            app::run_quiz(&mut term, settings, &identity, &mut store, &mut rng).await
        }
        Command::Streak => app::run_streak(&mut term, &mut rng).await,
        Command::Flashcards(args) => {
            let settings = args.settings()?;
            app::run_flashcards(&mut term, &settings, &mut rng).await
        }
        Command::History { action } => app::run_history(&mut store, &identity, action),
    }
}
