//! View models for the home and movie pages.
use serde::Serialize;
use tracing::error;

use crate::models::{Movie, MovieDetails};
use crate::tmdb::{image_url, select_trailer, youtube_embed_url, CatalogApi, ImageSize};
use crate::utils::{format_rating, format_runtime, release_year};

pub const TRENDING_LIMIT: usize = 6;
pub const POPULAR_LIMIT: usize = 12;
pub const TOP_RATED_LIMIT: usize = 6;
pub const CAST_LIMIT: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct MovieCard {
    pub id: i32,
    pub title: String,
    pub poster_url: String,
    pub rating: String,
    pub release_year: Option<i32>,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: image_url(movie.poster_path.as_deref(), ImageSize::Original),
            rating: format_rating(movie.vote_average),
            release_year: release_year(&movie.release_date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub trending: Vec<MovieCard>,
    pub popular: Vec<MovieCard>,
    pub top_rated: Vec<MovieCard>,
    pub loading: bool,
}

impl HomeView {
    pub fn pending() -> Self {
        Self {
            trending: Vec::new(),
            popular: Vec::new(),
            top_rated: Vec::new(),
            loading: true,
        }
    }
}

fn cards(movies: &[Movie], limit: usize) -> Vec<MovieCard> {
    movies.iter().take(limit).map(MovieCard::from).collect()
}

/// Fetches the three home lists together; one failure leaves all of them empty.
pub async fn load_home(api: &dyn CatalogApi) -> HomeView {
    let mut view = HomeView::pending();
    match tokio::try_join!(api.trending(), api.popular(1), api.top_rated()) {
        Ok((trending, popular, top_rated)) => {
            view.trending = cards(&trending, TRENDING_LIMIT);
            view.popular = cards(&popular.results, POPULAR_LIMIT);
            view.top_rated = cards(&top_rated, TOP_RATED_LIMIT);
        }
        Err(e) => error!("Error loading movies: {:#}", e),
    }
    view.loading = false;
    view
}

#[derive(Debug, Clone, Serialize)]
pub struct CastCard {
    pub id: i32,
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetailView {
    pub id: i32,
    pub title: String,
    pub overview: String,
    pub backdrop_url: String,
    pub poster_url: String,
    pub rating: String,
    pub runtime: Option<String>,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
    pub cast: Vec<CastCard>,
    pub trailer_url: Option<String>,
}

impl From<&MovieDetails> for MovieDetailView {
    fn from(details: &MovieDetails) -> Self {
        let movie = &details.movie;
        let cast = details
            .credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| CastCard {
                id: c.id,
                name: c.name.clone(),
                character: c.character.clone(),
                profile_url: image_url(c.profile_path.as_deref(), ImageSize::W200),
            })
            .collect();

        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            backdrop_url: image_url(movie.backdrop_path.as_deref(), ImageSize::Original),
            poster_url: image_url(movie.poster_path.as_deref(), ImageSize::W500),
            rating: format_rating(movie.vote_average),
            runtime: movie.runtime.map(format_runtime),
            release_year: release_year(&movie.release_date),
            genres: movie.genres.iter().map(|g| g.name.clone()).collect(),
            cast,
            trailer_url: select_trailer(&details.videos.results).map(|v| youtube_embed_url(&v.key)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    pub movie: Option<MovieDetailView>,
    pub loading: bool,
}

pub async fn load_movie(api: &dyn CatalogApi, id: i32) -> MovieView {
    let movie = match api.movie_details(id).await {
        Ok(details) => Some(MovieDetailView::from(&details)),
        Err(e) => {
            error!("Error loading movie {}: {:#}", id, e);
            None
        }
    };
    MovieView {
        movie,
        loading: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastMember, Credits, Genre, Video, Videos};

    #[test]
    fn card_carries_release_year() {
        let movie = Movie {
            id: 603,
            title: "The Matrix".to_string(),
            vote_average: 8.2,
            release_date: "1999-03-31".to_string(),
            ..Movie::default()
        };
        let card = MovieCard::from(&movie);
        assert_eq!(card.release_year, Some(1999));
        assert_eq!(card.rating, "8.2");
        assert_eq!(card.poster_url, crate::tmdb::PLACEHOLDER_IMAGE);

        let undated = MovieCard::from(&Movie::default());
        assert_eq!(undated.release_year, None);
    }

    #[test]
    fn detail_view_derives_display_fields() {
        let details = MovieDetails {
            movie: Movie {
                id: 550,
                title: "Fight Club".to_string(),
                backdrop_path: None,
                poster_path: Some("/p.jpg".to_string()),
                vote_average: 8.433,
                release_date: "1999-10-15".to_string(),
                runtime: Some(139),
                genres: vec![Genre {
                    id: 18,
                    name: "Drama".to_string(),
                }],
                ..Movie::default()
            },
            credits: Credits {
                cast: (0..10)
                    .map(|i| CastMember {
                        id: i,
                        name: format!("Actor {i}"),
                        character: format!("Role {i}"),
                        profile_path: None,
                    })
                    .collect(),
            },
            videos: Videos {
                results: vec![Video {
                    id: "v".to_string(),
                    key: "SUXWAEX2jlg".to_string(),
                    name: "Official Trailer".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Trailer".to_string(),
                }],
            },
        };

        let view = MovieDetailView::from(&details);
        assert_eq!(view.rating, "8.4");
        assert_eq!(view.runtime.as_deref(), Some("2h 19m"));
        assert_eq!(view.release_year, Some(1999));
        assert_eq!(view.backdrop_url, crate::tmdb::PLACEHOLDER_IMAGE);
        assert_eq!(view.poster_url, "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(view.cast.len(), CAST_LIMIT);
        assert_eq!(view.genres, vec!["Drama".to_string()]);
        assert_eq!(
            view.trailer_url.as_deref(),
            Some("https://www.youtube.com/embed/SUXWAEX2jlg")
        );
    }
}
