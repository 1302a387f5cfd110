use crate::filter::FilterCodec;
use crate::images::ImageUrlBuilder;
use crate::server::AppContext;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use cinescope_common::{Genre, ImageSize, MovieSummary, ResultPage};
use serde::Serialize;

pub fn movie_routes() -> Router<AppContext> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/genres", get(list_genres))
}

/// A movie plus presentation fields derived from it.
#[derive(Serialize)]
struct MovieView {
    #[serde(flatten)]
    movie: MovieSummary,
    poster_url: String,
    genres: Vec<&'static str>,
}

#[derive(Serialize)]
struct MoviesResponse {
    results: Vec<MovieView>,
    page: u32,
    total_pages: u32,
    total_results: u64,
}

impl MoviesResponse {
    fn from_page(page: ResultPage, images: &ImageUrlBuilder) -> Self {
        let results = page
            .items
            .into_iter()
            .map(|movie| MovieView {
                poster_url: images.url(movie.poster_path.as_deref(), ImageSize::W500),
                genres: movie.genres().map(Genre::label).collect(),
                movie,
            })
            .collect();

        Self {
            results,
            page: page.page_number,
            total_pages: page.total_pages,
            total_results: page.total_results,
        }
    }
}

/// `GET /api/movies?search=&releaseYear=&page=`
async fn list_movies(
    State(ctx): State<AppContext>,
    RawQuery(raw): RawQuery,
) -> Result<Json<MoviesResponse>, (StatusCode, Json<serde_json::Value>)> {
    let params = ctx.codec.deserialize(raw.as_deref().unwrap_or_default());
    let query = params.to_query();

    match ctx.pages.fetch_page(&query).await {
        Ok(page) => Ok(Json(MoviesResponse::from_page(page, &ctx.images))),
        Err(e) => {
            tracing::error!(
                keyword = ?query.keyword,
                year = ?query.release_year,
                page = query.page,
                error = %e,
                "Movie search failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to search movies." })),
            ))
        }
    }
}

#[derive(Serialize)]
struct GenreView {
    id: u32,
    name: &'static str,
}

/// `GET /api/genres`
async fn list_genres() -> Json<Vec<GenreView>> {
    Json(
        Genre::ALL
            .into_iter()
            .map(|g| GenreView {
                id: g.id(),
                name: g.label(),
            })
            .collect(),
    )
}
