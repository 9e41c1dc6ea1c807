use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_seed(config: Config) -> anyhow::Result<()> {
    let feed_url = config.seed.feed_url.clone();
    let state = SharedState::new(config).await?;

    println!("Fetching seed feed from {feed_url}...");

    let report = state.seed_service.seed().await?;

    println!(
        "✓ Fetched {} records, wrote {} ({} mode)",
        report.fetched, report.inserted, report.mode
    );
    println!(
        "  Store now holds {} records",
        state.store.count_sale_records().await?
    );

    Ok(())
}
