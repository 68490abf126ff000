//! Command handlers: wiring config, store, and adapters.

use reelstack_core::{FeedId, LeaderboardMode};
use reelstack_database::{DatabaseFeedStore, establish_connection, run_migrations};
use reelstack_error::{ConfigError, ReelstackResult};
use reelstack_feed::{Engagement, FeedAssembler};
use reelstack_server::{ApiState, serve};
use reelstack_sources::{
    CatalogAdapter, GeneratedAdapter, ScrapeAdapter, SearchAdapter, SourcesConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn load_sources_config(path: Option<&Path>) -> ReelstackResult<SourcesConfig> {
    match path {
        Some(path) => SourcesConfig::from_file(path),
        None => Ok(SourcesConfig::from_env()),
    }
}

fn connect_store() -> ReelstackResult<Arc<DatabaseFeedStore>> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| ConfigError::new("DATABASE_URL environment variable not set"))?;

    let mut conn = establish_connection()?;
    run_migrations(&mut conn)?;

    Ok(Arc::new(DatabaseFeedStore::connect(&database_url)?))
}

fn build_assembler(
    store: Arc<DatabaseFeedStore>,
    config: &SourcesConfig,
) -> FeedAssembler<DatabaseFeedStore> {
    let mut assembler = FeedAssembler::new(store.clone());

    if let Some(catalog) = &config.catalog {
        assembler = assembler.with_adapter(Arc::new(CatalogAdapter::new(store.clone(), catalog)));
    }
    if let Some(generated) = &config.generated {
        assembler = assembler.with_adapter(Arc::new(GeneratedAdapter::new(generated)));
    }
    if let Some(search) = &config.search {
        assembler = assembler.with_adapter(Arc::new(SearchAdapter::new(search)));
    }
    if let Some(scrape) = &config.scrape {
        assembler = assembler.with_adapter(Arc::new(ScrapeAdapter::new(scrape)));
    }

    assembler
}

/// Serve the HTTP API.
pub async fn run_serve(addr: SocketAddr, config: Option<&Path>) -> ReelstackResult<()> {
    let config = load_sources_config(config)?;
    let store = connect_store()?;
    let assembler = Arc::new(build_assembler(store.clone(), &config));

    let state = ApiState::new(store, assembler);
    serve(addr, state).await
}

/// Run one fetch cycle for a feed and report the outcome.
pub async fn run_fetch(
    feed: Uuid,
    prompt: Option<String>,
    limit: usize,
    config: Option<&Path>,
) -> ReelstackResult<()> {
    let config = load_sources_config(config)?;
    let store = connect_store()?;
    let assembler = build_assembler(store.clone(), &config);

    let feed_id = FeedId::from(feed);
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            use reelstack_interface::FeedRepository;
            store
                .get_feed(feed_id)
                .await?
                .map(|feed| feed.prompt)
                .ok_or_else(|| reelstack_error::NotFoundError::new("feed", feed_id.to_string()))?
        }
    };

    let outcome = assembler.run_fetch_cycle(feed_id, &prompt, limit).await?;
    if outcome.already_running {
        info!("a fetch cycle was already in flight for this feed");
    }
    println!("inserted: {}", outcome.inserted);
    Ok(())
}

/// Print the leaderboard for the given mode.
pub async fn print_leaderboard(mode: LeaderboardMode, limit: Option<i64>) -> ReelstackResult<()> {
    let store = connect_store()?;
    let engagement = Engagement::new(store);

    let entries = engagement.leaderboard(mode, limit).await?;
    if entries.is_empty() {
        println!("no entries yet");
        return Ok(());
    }

    for (rank, entry) in entries.iter().enumerate() {
        let metric = match mode {
            LeaderboardMode::Daily => entry.daily_streak,
            LeaderboardMode::Total => entry.total_count,
        };
        println!(
            "{:>3}. {:<24} {:>6}  (best streak {})",
            rank + 1,
            entry.name,
            metric,
            entry.best_streak
        );
    }
    Ok(())
}
