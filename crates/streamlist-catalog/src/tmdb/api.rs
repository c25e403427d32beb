use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use streamlist_models::{CatalogItem, DetailRecord, Genre, Review};
use tracing::{debug, warn};
use crate::error::CatalogError;
use crate::request::DiscoverSort;
use crate::traits::ProviderPage;

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
    page: Option<u32>,
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    runtime: Option<u32>,
    budget: Option<u64>,
    revenue: Option<u64>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    tagline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbReviewsResponse {
    #[serde(default)]
    results: Vec<TmdbReview>,
}

#[derive(Debug, Deserialize)]
struct TmdbReview {
    id: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    content: String,
    created_at: String,
    author_details: Option<TmdbAuthorDetails>,
}

#[derive(Debug, Deserialize)]
struct TmdbAuthorDetails {
    rating: Option<f32>,
}

/// Provider sends "" for unknown strings; treat those as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn pick_title(title: Option<String>, original_title: Option<String>) -> String {
    non_empty(title).or_else(|| non_empty(original_title)).unwrap_or_default()
}

fn clamp_vote(vote: Option<f32>) -> Option<f32> {
    vote.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 10.0))
}

fn dedup_genre_ids(mut ids: Vec<u32>) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}

fn to_catalog_item(movie: TmdbMovie) -> CatalogItem {
    CatalogItem {
        id: movie.id,
        title: pick_title(movie.title, movie.original_title),
        overview: movie.overview.unwrap_or_default(),
        poster_path: non_empty(movie.poster_path),
        release_date: non_empty(movie.release_date),
        vote_average: clamp_vote(movie.vote_average),
        genre_ids: dedup_genre_ids(movie.genre_ids),
    }
}

/// Decode a `/search/movie` or `/discover/movie` body.
///
/// A body without `results` decodes to an empty page, matching what the
/// provider sends for out-of-range pages.
pub fn decode_list(body: &str, requested_page: u32) -> Result<ProviderPage, CatalogError> {
    let response: TmdbListResponse = serde_json::from_str(body)?;
    Ok(ProviderPage {
        page: response.page.unwrap_or(requested_page),
        total_pages: response.total_pages.unwrap_or(1),
        items: response.results.into_iter().map(to_catalog_item).collect(),
    })
}

pub fn decode_detail(body: &str) -> Result<DetailRecord, CatalogError> {
    let detail: TmdbMovieDetail = serde_json::from_str(body)?;
    let genres: Vec<Genre> = detail
        .genres
        .into_iter()
        .map(|g| Genre { id: g.id, name: g.name })
        .collect();

    Ok(DetailRecord {
        item: CatalogItem {
            id: detail.id,
            title: pick_title(detail.title, detail.original_title),
            overview: detail.overview.unwrap_or_default(),
            poster_path: non_empty(detail.poster_path),
            release_date: non_empty(detail.release_date),
            vote_average: clamp_vote(detail.vote_average),
            genre_ids: dedup_genre_ids(genres.iter().map(|g| g.id).collect()),
        },
        runtime: detail.runtime.filter(|m| *m > 0),
        budget: detail.budget.unwrap_or(0),
        revenue: detail.revenue.unwrap_or(0),
        genres,
        tagline: non_empty(detail.tagline),
        vote_count: detail.vote_count.unwrap_or(0),
    })
}

/// Decode a reviews body. Reviews with an unreadable timestamp are skipped
/// rather than failing the whole list.
pub fn decode_reviews(body: &str) -> Result<Vec<Review>, CatalogError> {
    let response: TmdbReviewsResponse = serde_json::from_str(body)?;
    let mut reviews = Vec::with_capacity(response.results.len());

    for review in response.results {
        let created_at = match DateTime::parse_from_rfc3339(&review.created_at) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                warn!("Skipping review {} with bad created_at {:?}: {}", review.id, review.created_at, e);
                continue;
            }
        };
        reviews.push(Review {
            id: review.id,
            author: review.author,
            content: review.content,
            created_at,
            author_rating: clamp_vote(review.author_details.and_then(|d| d.rating)),
        });
    }

    Ok(reviews)
}

/// GET `{base_url}{path}` with the api key and extra query pairs, returning the body
async fn get_body(
    client: &Client,
    base_url: &str,
    path: &str,
    api_key: &str,
    query: &[(&str, String)],
) -> Result<String, CatalogError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    debug!("GET {} {:?}", url, query);

    let response = client
        .get(&url)
        .query(&[("api_key", api_key)])
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus {
            status: status.as_u16(),
            endpoint: path.to_string(),
        });
    }

    Ok(response.text().await?)
}

pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
    page: u32,
) -> Result<ProviderPage, CatalogError> {
    let body = get_body(
        client,
        base_url,
        "/search/movie",
        api_key,
        &[("query", query.to_string()), ("page", page.to_string())],
    )
    .await?;
    decode_list(&body, page)
}

pub async fn discover_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    page: u32,
    sort: DiscoverSort,
    genre: Option<u32>,
) -> Result<ProviderPage, CatalogError> {
    let mut query = vec![
        ("page", page.to_string()),
        ("sort_by", sort.as_param().to_string()),
    ];
    if let Some(genre) = genre {
        query.push(("with_genres", genre.to_string()));
    }

    let body = get_body(client, base_url, "/discover/movie", api_key, &query).await?;
    decode_list(&body, page)
}

pub async fn movie_detail(
    client: &Client,
    base_url: &str,
    api_key: &str,
    movie_id: u64,
) -> Result<DetailRecord, CatalogError> {
    let path = format!("/movie/{}", movie_id);
    let body = get_body(client, base_url, &path, api_key, &[]).await?;
    decode_detail(&body)
}

pub async fn movie_reviews(
    client: &Client,
    base_url: &str,
    api_key: &str,
    movie_id: u64,
) -> Result<Vec<Review>, CatalogError> {
    let path = format!("/movie/{}/reviews", movie_id);
    let body = get_body(client, base_url, &path, api_key, &[("page", "1".to_string())]).await?;
    decode_reviews(&body)
}
