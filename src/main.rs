use std::sync::Arc;

use git_telegram_relay::api::build_router;
use git_telegram_relay::error::RelayError;
use git_telegram_relay::logging::{FileLogger, setup_logging};
use git_telegram_relay::notifier::TelegramNotifier;
use git_telegram_relay::settings::Settings;
use git_telegram_relay::{AppState, load_config_or_empty};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let settings = Settings::from_env();

    let file_logger = settings.log_dir.clone().map(|dir| {
        FileLogger::new(dir, settings.log_max_files).with_rotation(settings.log_rotation.clone())
    });
    // Held until exit so buffered file logs are flushed.
    let _log_guard = match setup_logging(file_logger.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up file logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(settings).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), RelayError> {
    let config = load_config_or_empty(&settings.config_path);
    let notifier = TelegramNotifier::new(
        settings.telegram_api_base.clone(),
        settings.telegram_timeout,
    )?;

    let state = Arc::new(AppState { config, notifier });
    let app = build_router(state);

    let bind_address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", settings.config_path);
    info!("Telegram API base: {}", settings.telegram_api_base);

    axum::serve(listener, app).await?;
    Ok(())
}
