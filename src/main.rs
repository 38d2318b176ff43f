use anyhow::{anyhow, Context, Result};
use cineshelf::config::Config;
use cineshelf::saved::SavedMovies;
use cineshelf::screens::{DetailScreen, DetailState, SavedScreen};
use cineshelf::storage::{FileStore, KeyValueStore};
use cineshelf::tmdb::{CatalogApi, TmdbClient};
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: cineshelf movie <id> | save <id> | unsave <id> | saved | search [query...]";

#[derive(Debug, PartialEq)]
enum Command {
    Movie(String),
    Save(String),
    Unsave(String),
    Saved,
    Search(Option<String>),
}

fn parse_command(args: &[String]) -> Result<Command> {
    let (name, rest) = args.split_first().ok_or_else(|| anyhow!(USAGE))?;
    match name.as_str() {
        "movie" | "save" | "unsave" => {
            let id = rest
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("missing movie id\n{USAGE}"))?;
            match name.as_str() {
                "movie" => Ok(Command::Movie(id)),
                "save" => Ok(Command::Save(id)),
                _ => Ok(Command::Unsave(id)),
            }
        }
        "saved" => Ok(Command::Saved),
        "search" => {
            let query = rest.join(" ");
            Ok(Command::Search(Some(query).filter(|q| !q.trim().is_empty())))
        }
        other => Err(anyhow!("unknown command '{other}'\n{USAGE}")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.store_path));
    let saved = Arc::new(SavedMovies::new(store));
    let catalog: Arc<dyn CatalogApi> =
        Arc::new(TmdbClient::from_config(&config).context("Failed to build TMDB client")?);

    match command {
        Command::Movie(id) => {
            let mut screen = DetailScreen::new(catalog, saved, id);
            screen.load().await;
            print_detail(&screen)?;
        }
        Command::Save(id) => {
            let mut screen = DetailScreen::new(catalog, saved, id);
            screen.load().await;
            print_detail(&screen)?;
            match screen.save().await {
                Some(true) => println!("Saved."),
                _ => println!("Already saved."),
            }
        }
        Command::Unsave(id) => {
            let mut screen = DetailScreen::new(catalog, saved, id);
            screen.load().await;
            print_detail(&screen)?;
            match screen.unsave().await {
                Some(true) => println!("Removed from saved."),
                _ => println!("Not saved."),
            }
        }
        Command::Saved => {
            let mut screen = SavedScreen::new(saved);
            let rows = screen.on_focus().await;
            if rows.is_empty() {
                println!("{}", SavedScreen::EMPTY_MESSAGE);
            }
            for row in rows {
                println!("{:>8}  {}  ({})", row.id, row.title, row.subtitle);
            }
        }
        Command::Search(query) => {
            let movies = catalog
                .fetch_movies(query.as_deref())
                .await
                .context("Catalog listing failed")?;
            for m in movies {
                println!(
                    "{:>8}  {}  ({} • {})",
                    m.id,
                    m.title,
                    m.release_year().unwrap_or_default(),
                    m.rating_label()
                );
            }
        }
    }
    Ok(())
}

fn print_detail(screen: &DetailScreen) -> Result<()> {
    match screen.state() {
        DetailState::Loading => Err(anyhow!("movie did not load")),
        DetailState::Failed { message, .. } => Err(anyhow!("{message}")),
        DetailState::Loaded(_) => {
            let Some(view) = screen.view() else {
                return Ok(());
            };
            println!("{}", view.title);
            let mut line = Vec::new();
            line.extend(view.year);
            line.extend(view.runtime);
            line.push(format!("{} {}", view.rating, view.votes));
            println!("{}", line.join("  "));
            if let Some(url) = view.poster_url {
                println!("Poster: {url}");
            }
            for row in view.info {
                println!("{}: {}", row.label, row.value);
            }
            println!("Saved: {}", if view.is_saved { "yes" } else { "no" });
            Ok(())
        }
    }
}
