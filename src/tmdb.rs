use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::models::{Genre, GenreList, Movie, MovieDetails, Paged, Video};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W200,
    #[default]
    W500,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Typed catalog reads. Each call is a single GET with no caching or retry.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn trending(&self) -> Result<Vec<Movie>>;
    async fn popular(&self, page: u32) -> Result<Paged<Movie>>;
    async fn top_rated(&self) -> Result<Vec<Movie>>;
    async fn search(&self, query: &str) -> Result<Vec<Movie>>;
    async fn movie_details(&self, id: i32) -> Result<MovieDetails>;
    async fn genres(&self) -> Result<Vec<Genre>>;
    async fn discover_by_genre(&self, genre_id: i32) -> Result<Vec<Movie>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    /// Talks to TMDB directly, attaching the configured key to every request.
    pub fn new(config: &Config) -> Result<Self> {
        Self::build(&config.tmdb_base_url, Some(config.api_key.clone()))
    }

    /// Talks to a CineVault proxy (`http://host/api`), which adds the key itself.
    pub fn via_proxy(proxy_base: &str) -> Result<Self> {
        Self::build(proxy_base, None)
    }

    fn build(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("cinevault/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, endpoint);
        let mut pairs: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        if let Some(key) = &self.api_key {
            pairs.push(format!("api_key={}", urlencoding::encode(key)));
        }
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", endpoint);
        let res = self
            .client
            .get(self.url(endpoint, params))
            .send()
            .await
            .with_context(|| format!("{} request failed", endpoint))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", endpoint, status.as_u16(), text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("{} JSON parse failed", endpoint))?;
        Ok(parsed)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn trending(&self) -> Result<Vec<Movie>> {
        let data: Paged<Movie> = self.get_json("trending/movie/week", &[]).await?;
        Ok(data.results)
    }

    async fn popular(&self, page: u32) -> Result<Paged<Movie>> {
        self.get_json("movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn top_rated(&self) -> Result<Vec<Movie>> {
        let data: Paged<Movie> = self.get_json("movie/top_rated", &[]).await?;
        Ok(data.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let data: Paged<Movie> = self
            .get_json("search/movie", &[("query", query.to_string())])
            .await?;
        Ok(data.results)
    }

    async fn movie_details(&self, id: i32) -> Result<MovieDetails> {
        self.get_json(
            &format!("movie/{id}"),
            &[("append_to_response", "credits,videos".to_string())],
        )
        .await
    }

    async fn genres(&self) -> Result<Vec<Genre>> {
        let data: GenreList = self.get_json("genre/movie/list", &[]).await?;
        Ok(data.genres)
    }

    async fn discover_by_genre(&self, genre_id: i32) -> Result<Vec<Movie>> {
        let data: Paged<Movie> = self
            .get_json(
                "discover/movie",
                &[
                    ("with_genres", genre_id.to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                ],
            )
            .await?;
        Ok(data.results)
    }
}

/// CDN URL for an image path; a missing path maps to the local placeholder.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{IMAGE_BASE}/{}{p}", size.as_str()),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

pub fn youtube_embed_url(key: &str) -> String {
    format!("{YOUTUBE_EMBED_BASE}{key}")
}

pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(key: &str, site: &str, video_type: &str) -> Video {
        Video {
            id: format!("id-{key}"),
            key: key.to_string(),
            name: key.to_string(),
            site: site.to_string(),
            video_type: video_type.to_string(),
        }
    }

    #[test]
    fn image_url_uses_placeholder_without_path() {
        assert_eq!(image_url(None, ImageSize::W500), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(None, ImageSize::Original), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(Some(""), ImageSize::W200), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn image_url_prefixes_size_token() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::default()),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url(Some("/b.jpg"), ImageSize::Original),
            "https://image.tmdb.org/t/p/original/b.jpg"
        );
    }

    #[test]
    fn picks_first_youtube_trailer() {
        let videos = vec![
            video("teaser", "YouTube", "Teaser"),
            video("vimeo", "Vimeo", "Trailer"),
            video("main", "YouTube", "Trailer"),
            video("second", "YouTube", "Trailer"),
        ];
        let trailer = select_trailer(&videos).expect("trailer");
        assert_eq!(trailer.key, "main");
        assert_eq!(
            youtube_embed_url(&trailer.key),
            "https://www.youtube.com/embed/main"
        );
    }

    #[test]
    fn no_trailer_when_none_match() {
        let videos = vec![video("teaser", "YouTube", "Teaser")];
        assert!(select_trailer(&videos).is_none());
    }

    #[test]
    fn direct_client_appends_encoded_key() {
        let client = TmdbClient::build("https://api.example.test/3/", Some("k&1".to_string()))
            .expect("client");
        assert_eq!(
            client.url("search/movie", &[("query", "the matrix".to_string())]),
            "https://api.example.test/3/search/movie?query=the%20matrix&api_key=k%261"
        );
    }

    #[test]
    fn proxy_client_omits_key() {
        let client = TmdbClient::via_proxy("http://localhost:3000/api").expect("client");
        assert_eq!(
            client.url("movie/550", &[("append_to_response", "credits,videos".to_string())]),
            "http://localhost:3000/api/movie/550?append_to_response=credits%2Cvideos"
        );
        assert_eq!(
            client.url("genre/movie/list", &[]),
            "http://localhost:3000/api/genre/movie/list"
        );
    }
}
