use clap::Parser;
use courier_ratio::server::{self, AppState};
use courier_ratio::utils::logger::{self, LogFormat};
use courier_ratio::utils::validation::Validate;
use courier_ratio::{ServerConfig, UpstreamGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ServerConfig::parse().load_file() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logger::init(LogFormat::from_json_flag(config.json_logs), config.verbose);

    tracing::info!("Starting courier-ratio proxy");

    // A missing credential is fatal: the proxy never starts without one.
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let address = config.bind_address()?;
    let gateway = UpstreamGateway::new(config.gateway_config())?;

    server::serve(address, AppState::new(gateway)).await
}
