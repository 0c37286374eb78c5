mod config;
mod cycle;
mod identity;
mod indicator;
mod reading;
mod sensors;
mod session;
mod transport;
mod trigger;
mod wifi;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::AgentConfig;
use cycle::CycleController;
use indicator::LogIndicator;
use sensors::{SyntheticBarometer, SyntheticHygrometer};
use session::NetworkSession;
use transport::TcpConnector;
use trigger::PeriodicTrigger;
use wifi::SimulatedWifi;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AgentConfig::from_env()?;

    info!("env sensor agent starting: {}", config.location);
    info!("  collector: {}", config.collector_addr);
    info!("  interval:  {:?}", config.sample_interval);

    // Host-bench wiring: simulated radio and synthetic sensors against
    // the real TCP transport. On a board build these are replaced by the
    // radio and driver implementations; a driver that fails to come up
    // here is the one fatal startup condition.
    let wifi = SimulatedWifi::new([0x02, 0x00, 0x00, 0xab, 0xcd, 0x01]);
    let hygrometer = SyntheticHygrometer::new(21.5, 45.0);
    let barometer = SyntheticBarometer::new(101_300.0);

    let connector = TcpConnector::new(config.collector_addr.clone());
    let session = NetworkSession::new(config.clone(), wifi, connector, LogIndicator);
    let trigger = PeriodicTrigger::start(config.sample_interval);

    CycleController::new(config, session, hygrometer, barometer)
        .run(trigger)
        .await;

    Ok(())
}
