use anyhow::{Context, Result};
use tracing::{error, info};

use wishlist_scraper_lib::application::RefreshUseCase;
use wishlist_scraper_lib::infrastructure::{
    ConfigManager, HttpClient, JsonDatasetRepository, bootstrap_console_logging,
    init_logging_with_config, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Config load may reset a corrupted file; its warnings need a subscriber
    let (config_manager, config) = {
        let _bootstrap = bootstrap_console_logging();
        let config_manager =
            ConfigManager::new().context("Failed to resolve configuration path")?;
        let config = config_manager
            .load_config()
            .await
            .context("Failed to load configuration")?;
        (config_manager, config)
    };

    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    logging::log_system_info();
    info!("Configuration: {:?}", config_manager.config_path());

    let result = run(&config).await;
    if let Err(e) = &result {
        error!("❌ Refresh failed: {:#}", e);
    }
    result
}

async fn run(config: &wishlist_scraper_lib::infrastructure::AppConfig) -> Result<()> {
    let fetcher = HttpClient::new(config.http.clone())?;
    let repository = JsonDatasetRepository::new(&config.paths.data_file, &config.paths.urls_file);
    info!(
        "Dataset: {:?}, URL list: {:?}",
        repository.data_file(),
        repository.urls_file()
    );
    let use_case = RefreshUseCase::from_config(fetcher, repository, config)?;

    info!("🚀 Starting wishlist refresh");
    let summary = use_case.run().await?;
    info!("{}/{} products saved", summary.saved(), summary.total);
    Ok(())
}
