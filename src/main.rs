use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use pokemon_tcg_scraper::CardScraper;
use pokemon_tcg_scraper::card_watcher::CardWatcher;
use pokemon_tcg_scraper::config::AppConfig;
use pokemon_tcg_scraper::database::CardStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    info!(
        "Starting Pokémon TCG scraper for query '{}'",
        config.query.to_query_string()
    );

    let scraper = CardScraper::new(config.scraper.clone())?;
    let store = CardStore::new(&config.database_url).await?;
    let mut watcher = CardWatcher::new(scraper, store, config.query.clone(), config.fetch_details);
    if let Some(output) = &config.output {
        watcher = watcher.with_output(output);
    }

    // Run once immediately
    if let Err(e) = watcher.check_for_new_cards().await {
        error!("Error during initial check: {}", e);
    }

    let Some(schedule) = config.schedule else {
        return Ok(());
    };

    let sched = JobScheduler::new().await?;

    let job_watcher = watcher.clone();
    sched
        .add(Job::new_async(schedule.as_str(), move |_uuid, _l| {
            let watcher = job_watcher.clone();
            Box::pin(async move {
                if let Err(e) = watcher.check_for_new_cards().await {
                    error!("Error checking for cards: {}", e);
                }
            })
        })?)
        .await?;

    info!("Scheduler started with schedule '{}'", schedule);
    sched.start().await?;

    // Keep the program running
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
    }
}
