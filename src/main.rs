use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod infra;
mod usecase;


use crate::config::SyncConfig;
use crate::infra::mongo::source::MongoMemberSource;
use crate::infra::sheets::client::connect_service_account;
use crate::infra::sheets::sink::GoogleSheetSink;
use crate::usecase::services::sync_service::{SyncOptions, SyncService};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SyncConfig::from_env().context("failed to load sync configuration")?;

    let source = MongoMemberSource::connect(&config.mongo_uri, &config.db_name, &config.collection)
        .await
        .context("failed to open member store")?;

    let hub = connect_service_account(&config.credentials_path).await?;
    let sink = GoogleSheetSink::new(hub, config.spreadsheet_id.clone(), config.worksheet.clone());

    let service = SyncService::new(
        Arc::new(source),
        Arc::new(sink),
        SyncOptions {
            start_row: config.start_row,
            retry: config.retry_policy(),
            apply_layout: true,
        },
    );

    let report = service
        .run()
        .await
        .with_context(|| format!("failed to sync members into '{}'", config.worksheet))?;
    info!(
        delivered = report.delivered(),
        dropped = report.dropped,
        "sync report"
    );

    println!("✅ SUCCESS: MongoDB → Google Sheets sync (DATA TYPES + PROFESSIONAL FORMATTING) completed");
    Ok(())
}
