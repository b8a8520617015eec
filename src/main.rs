use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use layoutsmith::cli::Args;
use layoutsmith::config::Config;
use layoutsmith::history::HistoryStore;
use layoutsmith::pipeline::Pipeline;
use layoutsmith::provider::ProviderRegistry;
use layoutsmith::relay::{self, AppState};

fn init_tracing(debug: bool) {
    let default = if debug {
        "layoutsmith=debug,tower_http=debug"
    } else {
        "layoutsmith=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.debug);

    let cfg = Config::load(&args)?;
    let registry = ProviderRegistry::from_config(&cfg)?;
    let available: Vec<_> = registry.available().iter().map(|k| k.tag()).collect();
    info!(default = %registry.default_kind(), ?available, "backends ready");

    let history = Arc::new(HistoryStore::new());
    let state = AppState::new(Pipeline::new(registry, history));

    let addr = cfg.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on ws://{addr}/ws");

    relay::serve(listener, state).await
}
