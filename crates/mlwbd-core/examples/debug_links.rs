//! Debug script walking both resolution pipelines against the live site
//!
//! Run with: cargo run --example debug_links -p mlwbd-core

use mlwbd_core::{MlwbdScraper, is_usable_direct_link};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let scraper = MlwbdScraper::new();

    println!("1. Searching for 'avatar'...\n");
    let movies = scraper.search("avatar").await;
    println!("Found {} movies.", movies.len());

    let Some(movie) = movies.first() else {
        println!("No movies found, stopping here.");
        return;
    };
    println!("First movie: {} - {}\n", movie.title, movie.link);

    println!("2. Resolving download links...\n");
    let groups = scraper.download_links(&movie.link).await;
    println!("Found {} link groups.", groups.len());

    for group in groups.iter().take(3) {
        println!("  {} ({} links)", group.title, group.links.len());
        for link in group.links.iter().take(3) {
            println!("    [{}] {} -> {}", link.label, link.info, link.url);
        }
    }

    let Some(target) = groups.first().and_then(|g| g.links.first()) else {
        println!("No download links found, stopping here.");
        return;
    };

    println!("\n3. Generating direct link for {}...\n", target.url);
    match scraper.direct_link(&target.url).await {
        Ok(reply) if is_usable_direct_link(&reply) => {
            println!("Direct URL: {}", reply);
        }
        Ok(reply) => {
            println!("Upstream refused: {}", reply);
        }
        Err(err) => {
            println!("Resolution failed: {}", err);
        }
    }
}
