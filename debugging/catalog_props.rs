//! Fetch a movie from TMDB, print the raw JSON and check that it decodes
//! into the typed detail record stored by the app.
//! Usage:
//!   cargo run --bin catalog_props -- <tmdb_id>
//! Requires TMDB_ACCESS_TOKEN or TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cineshelf::config::Config;
use cineshelf::models::MovieDetail;
use cineshelf::tmdb::TmdbClient;
use dotenvy::dotenv;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin catalog_props -- <tmdb_id>");
        std::process::exit(1);
    }
    let config = Config::from_env()?;
    let client = TmdbClient::from_config(&config).context("Failed to build TMDB client")?;

    let raw = client
        .fetch_movie_raw(&args[1])
        .await
        .with_context(|| format!("fetching movie {}", args[1]))?;
    println!("{}", serde_json::to_string_pretty(&raw)?);

    match serde_json::from_value::<MovieDetail>(raw) {
        Ok(detail) => {
            println!("--- typed detail ---");
            println!("{}", serde_json::to_string_pretty(&detail)?);
            println!("--- saved summary ---");
            println!("{}", serde_json::to_string_pretty(&detail.summary())?);
        }
        Err(e) => println!("Typed decode failed: {}", e),
    }
    Ok(())
}
