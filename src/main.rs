use anyhow::Result;

use energymatch::{AppConfig, EnergyMatchError, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // tracing is not installed yet
            if let Some(err) = e.downcast_ref::<EnergyMatchError>() {
                eprintln!("{}", err.user_message());
            }
            return Err(e.context("Failed to load configuration"));
        }
    };
    telemetry::init_tracing(&config.logging)?;

    web::run(config).await
}
