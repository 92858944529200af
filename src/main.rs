use anyhow::Result;
use glidego_planner::{AppState, GlideGoConfig, TravelPlanner, VERSION, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GlideGoConfig::load()?;
    let _telemetry = telemetry::init(&config.logging)?;
    tracing::info!("Starting glidego-planner {}", VERSION);

    let planner = TravelPlanner::from_config(&config)?;
    web::run(AppState::new(planner), &config.server).await
}
