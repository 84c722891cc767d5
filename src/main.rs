//! coaweb main entry point

use anyhow::Context;
use clap::Parser;
use coaweb_api::start_server;
use coaweb_config::Config;
use coaweb_core::{AccountsViewModel, CompanyContext, HttpAccountsService, ViewOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "coaweb")]
#[command(author = "coaweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A Chart of Accounts web view backed by a banking service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over the configured level
    let loaded = Config::load(args.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::or_defaults(loaded).context("Failed to load configuration")?;
    log::info!(
        "Config loaded: service={}, debounce={}ms, server_filtering={}",
        config.service.base_url,
        config.view.debounce_ms,
        config.view.server_filtering
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let service = HttpAccountsService::new(&config.service).context("Failed to build service client")?;
        let view = AccountsViewModel::new(Arc::new(service), ViewOptions::from(&config.view));

        if let Some(ref company_id) = config.service.default_company {
            if let Err(e) = view.select_company(Some(CompanyContext::new(company_id.clone()))).await {
                log::warn!("Initial load for {} failed: {}", company_id, e);
            }
        }

        start_server(config, view).await?;
        Ok::<(), anyhow::Error>(())
    })
}
