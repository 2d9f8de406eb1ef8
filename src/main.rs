use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seat_meter::web::WebServer;
use seat_meter_core::api::SeatMeter;
use seat_meter_core::config::{Config, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings: file < env < CLI
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_env();
    settings.merge_cli(&cli);
    settings.validate();

    match settings.seats_directory() {
        Ok(dir) => tracing::info!("Reading seats from {}", dir.display()),
        Err(e) => tracing::warn!("{}; the dashboard will report it on every request", e),
    }
    tracing::info!("Usage endpoint: {}", settings.usage.url());

    let meter = SeatMeter::new(settings)?;
    WebServer::new(meter).run().await
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("seat_meter=debug,seat_meter_core=debug")
    } else {
        EnvFilter::new("seat_meter=info,seat_meter_core=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
