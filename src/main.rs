use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use parley_term::application::cli;
use parley_term::application::ui;
use parley_term::domain::models::BackendName;
use parley_term::Config;
use parley_term::ConfigKey;
use parley_term::BackendManager;
use parley_term::ConversationService;

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    // The TUI owns stdout, so logs go to a file in the cache directory.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("parley");
    let _ = std::fs::create_dir_all(&log_dir);
    let appender = tracing_appender::rolling::never(log_dir, "parley-term.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(Config::get(ConfigKey::LogLevel))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    return guard;
}

#[tokio::main]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    if !cli::parse().await? {
        return Ok(());
    }

    let _logging_guard = init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting parley-term");

    // Credential and listing failures are fatal before any session exists;
    // both are reported on stderr without touching the terminal state.
    let backend = match BackendManager::get(BackendName::default()) {
        Ok(backend) => backend,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let conversation = Arc::new(ConversationService::new(backend));
    let assistants = match conversation.initialize().await {
        Ok(assistants) => assistants,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    ui::start_loop(conversation, assistants).await?;
    return Ok(());
}
