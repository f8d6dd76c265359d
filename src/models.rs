use serde::{Deserialize, Deserializer, Serialize};

/// TMDB sends `null` for some scalar and list fields; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Movie {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
}

/// Detail payload for `movie/{id}?append_to_response=credits,videos`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credits: Credits,
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: Videos,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Genre {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CastMember {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Videos {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Video {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub video_type: String,
}

/// List envelope shared by trending, popular, top-rated, search and discover.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Paged<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_item_tolerates_missing_fields() {
        let value = json!({
            "id": 550,
            "title": "Fight Club",
            "poster_path": null,
            "vote_average": 8.4
        });
        let movie: Movie = serde_json::from_value(value).expect("movie deserialize");
        assert_eq!(movie.id, 550);
        assert!(movie.poster_path.is_none());
        assert!(movie.backdrop_path.is_none());
        assert!(movie.genre_ids.is_empty());
        assert_eq!(movie.release_date, "");
        assert!(movie.runtime.is_none());
    }

    #[test]
    fn details_flatten_appended_credits_and_videos() {
        let value = json!({
            "id": 550,
            "title": "Fight Club",
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }],
            "credits": {
                "cast": [
                    { "id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/n.jpg" }
                ],
                "crew": []
            },
            "videos": {
                "results": [
                    { "id": "v1", "key": "abc", "name": "Trailer", "site": "YouTube", "type": "Trailer" }
                ]
            }
        });
        let details: MovieDetails = serde_json::from_value(value).expect("details deserialize");
        assert_eq!(details.movie.runtime, Some(139));
        assert_eq!(details.movie.genres[0].name, "Drama");
        assert_eq!(details.credits.cast[0].character, "The Narrator");
        assert_eq!(details.videos.results[0].video_type, "Trailer");
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let raw = r#"{"page":1,"results":[{"id":7,"title":"Nulls","overview":null,"release_date":null,"vote_average":null,"genre_ids":null}],"total_pages":1,"total_results":1}"#;
        let page: Paged<Movie> = serde_json::from_str(raw).expect("paged deserialize");
        let movie = &page.results[0];
        assert_eq!(movie.overview, "");
        assert_eq!(movie.release_date, "");
        assert_eq!(movie.vote_average, 0.0);
        assert!(movie.genre_ids.is_empty());

        let details: MovieDetails = serde_json::from_value(json!({
            "id": 7,
            "title": "Nulls",
            "credits": {
                "cast": [{ "id": 1, "name": null, "character": null, "profile_path": null }]
            },
            "videos": null
        }))
        .expect("details deserialize");
        assert_eq!(details.credits.cast[0].name, "");
        assert_eq!(details.credits.cast[0].character, "");
        assert!(details.videos.results.is_empty());
    }

    #[test]
    fn details_without_appended_resources_still_parse() {
        let details: MovieDetails =
            serde_json::from_value(json!({ "id": 1, "title": "Bare" })).expect("details");
        assert!(details.credits.cast.is_empty());
        assert!(details.videos.results.is_empty());
    }
}
