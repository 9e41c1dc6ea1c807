use anyhow::Context;

use crate::config::Config;
use crate::domain::{MAX_YEAR, MIN_YEAR, Month, MonthSelection};
use crate::state::SharedState;

pub async fn cmd_summary(config: Config, month: u32, year: Option<i32>) -> anyhow::Result<()> {
    let month = Month::new(month).context("Month must be between 1 and 12")?;

    let selection = match year {
        Some(y) if !(MIN_YEAR..=MAX_YEAR).contains(&y) => {
            anyhow::bail!("Year must be between {MIN_YEAR} and {MAX_YEAR}")
        }
        Some(y) => MonthSelection::in_year(month, y),
        None => MonthSelection::new(month),
    };

    let state = SharedState::new(config).await?;
    let combined = state.transaction_service.combined(selection).await?;

    match year {
        Some(y) => println!("Summary for month {month} of {y}"),
        None => println!("Summary for month {month}"),
    }
    println!("{:-<40}", "");

    let stats = &combined.statistics;
    println!("Sale amount:     {:.2}", stats.total_sale_amount);
    println!("Sold items:      {}", stats.total_sold_items);
    println!("Not sold items:  {}", stats.total_not_sold_items);

    println!();
    println!("Price ranges:");
    for (label, count) in combined.barchart.iter() {
        println!("  {label:<10} {count}");
    }

    println!();
    println!("Categories:");
    if combined.piechart.is_empty() {
        println!("  (none)");
    }
    for entry in &combined.piechart {
        println!("  {:<24} {}", entry.category, entry.count);
    }

    Ok(())
}
