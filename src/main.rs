use anyhow::Result;
use std::sync::Arc;
use storylab::core::config::Config;
use storylab::core::io::{NativeStorage, Storage};
use storylab::services::gateway::GenerationGateway;
use storylab::services::studio::Studio;
use storylab::services::workflow::{run_request_file, WorkflowManager};

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG as well as API keys.
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            eprintln!("Fix or remove 'config.yml' to continue.");
            return Err(e);
        }
    };

    config.ensure_directories()?;

    let gateway = GenerationGateway::from_config(&config)?;
    let storage: Arc<dyn Storage> = Arc::new(NativeStorage::new());
    let studio = Studio::new(&config, gateway, storage);

    // `storylab request.json` answers a single request and exits.
    if let Some(path) = std::env::args().nth(1) {
        return run_request_file(&studio, &config.visitor, &path).await;
    }

    let mut manager = WorkflowManager::new(&config, studio);
    manager.run().await?;

    Ok(())
}
