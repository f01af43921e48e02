//! BlockBot application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize logging (stderr, so the conversation owns stdout)
//! 3. Build the text generator and the dialogue controller
//! 4. Run the interactive terminal, or the HTTP API with `--serve`

mod cli;
mod repl;

use clap::Parser;
use tokio::io::BufReader;

use blockbot_api::routes;
use blockbot_api::state::AppState;
use blockbot_chat::{build_generator, DialogueController};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let (config_file, config) = args.load_config();

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting BlockBot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let generator = build_generator(&config.generator);
    let controller = DialogueController::new(&config, generator);

    if args.serve {
        let state = AppState::new(config.clone(), controller);
        routes::start_server(&config, state).await?;
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        repl::run(&controller, stdin, tokio::io::stdout()).await?;
        tracing::info!(turns = controller.turn_count(), "Session ended");
    }

    Ok(())
}
