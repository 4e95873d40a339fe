use std::sync::Arc;

use clap::Parser;
use console::style;
use log::{debug, info};

use wellkeep::{
    default_config_path, App, Cli, Config, LocalStore, QueryCache, Result, WellnessClient,
};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    debug!("Logger initialized");
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    let store = LocalStore::open(&config.data_file)?;
    let cache = Arc::new(QueryCache::new(config.cache_ttl()));
    let client = WellnessClient::new(cache)
        .with_service(Arc::new(store))
        .with_identity(config.principal()?);

    let mut app = App::new(client, config, config_path, cli.verbose);
    app.run(cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);
    info!("wellkeep starting up");

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
