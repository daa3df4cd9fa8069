use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use counsel_api::config::ApiConfig;
use counsel_api::handlers::AppState;
use counsel_api::helpers::database::initialize_store;
use counsel_api::{logging, routes};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "counsel-api", version, about = "Business consultation backend")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep documents in memory instead of the configured database file
    #[arg(long)]
    in_memory: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = ApiConfig::load(cli.config)?;
    let _log_guard = logging::init_logging(config.logging.as_ref());
    info!("Loaded configuration from {}", config_path.display());

    let store = initialize_store(&config, cli.in_memory)?;
    let bind_addr = config.bind_address();
    let state = web::Data::new(AppState::new(store, config.clone()));

    info!("Starting counsel-api server at http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(&config))
            .wrap(Logger::default())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
