//! List popular tickers command.

use anyhow::Result;
use stockscope_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Popular Tickers");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for ticker in &config.dashboard.popular_tickers {
        println!("  {}", ticker);
    }

    println!();
    println!("Use --popular <ticker> or --ticker <symbol> with the analyze command.");

    Ok(())
}
