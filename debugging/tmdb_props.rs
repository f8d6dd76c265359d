//! Query the catalog through the same client the server uses and print the result.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- search <query>
//!   cargo run --bin tmdb_props -- genre <genre_id>
//!   cargo run --bin tmdb_props -- genres
//!   cargo run --bin tmdb_props -- home
//! Requires TMDB_API_KEY in the environment (.env supported).
//! Set CINEVAULT_PROXY=http://host:port/api to go through a running server instead.

use anyhow::{Context, Result};
use cinevault::config::Config;
use cinevault::tmdb::{CatalogApi, TmdbClient};
use cinevault::views::{load_home, MovieCard, MovieDetailView};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Movie,
    Search,
    Genre,
    Genres,
    Home,
}

impl FromStr for Command {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(Command::Movie),
            "search" => Ok(Command::Search),
            "genre" => Ok(Command::Genre),
            "genres" => Ok(Command::Genres),
            "home" => Ok(Command::Home),
            _ => Err(anyhow::anyhow!(
                "command must be one of: movie, search, genre, genres, home"
            )),
        }
    }
}

fn cards(movies: &[cinevault::models::Movie]) -> Value {
    json!(movies.iter().map(MovieCard::from).collect::<Vec<_>>())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let mut args = env::args().skip(1);
    let command: Command = args
        .next()
        .context("missing command (movie|search|genre|genres|home)")?
        .parse()?;
    let rest: Vec<String> = args.collect();

    let client = match env::var("CINEVAULT_PROXY") {
        Ok(proxy) if !proxy.is_empty() => TmdbClient::via_proxy(&proxy)?,
        _ => TmdbClient::new(&Config::from_env()?)?,
    };

    let output = match command {
        Command::Movie => {
            let id: i32 = rest
                .first()
                .context("missing tmdb id")?
                .parse()
                .context("tmdb id must be numeric")?;
            let details = client.movie_details(id).await?;
            json!(MovieDetailView::from(&details))
        }
        Command::Search => {
            let query = rest.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("missing search query");
            }
            cards(&client.search(&query).await?)
        }
        Command::Genre => {
            let id: i32 = rest
                .first()
                .context("missing genre id")?
                .parse()
                .context("genre id must be numeric")?;
            cards(&client.discover_by_genre(id).await?)
        }
        Command::Genres => json!(client.genres().await?),
        Command::Home => json!(load_home(&client).await),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
