use std::{str::FromStr, sync::Arc};

use axum::{
    Router,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::debug;

use crate::{
    AppState,
    error::{AppError, AppResult},
    flash,
    forms::{AddForm, EditForm, FieldErrors},
    ranking, templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_search))
        .route("/edit", get(edit_form).post(edit_submit))
        .route("/delete", get(delete))
        .with_state(state)
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let movies = ranking::rank(state.store.all().await?);
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(templates::index_page(&movies, message.as_deref()))))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page("", &FieldErrors::default()))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> AppResult<Response> {
    let title = match form.validate() {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&form.new_title, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    let candidates = state.tmdb.search(&title).await?;
    Ok(Html(templates::select_page(&title, &candidates)).into_response())
}

/// Links may also carry a `title`; it is ignored in favour of the stored one.
///
/// Ids arrive as raw strings so a malformed value becomes an `AppError` page
/// rather than axum's plain-text query rejection.
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    movie_api_id: Option<String>,
    id: Option<String>,
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EditQuery>,
    jar: CookieJar,
) -> AppResult<Response> {
    if let Some(tmdb_id) = parse_param::<i64>("movie_api_id", q.movie_api_id.as_deref())? {
        return add_selected(&state, tmdb_id, jar).await;
    }

    let Some(id) = parse_param::<i32>("id", q.id.as_deref())? else {
        return Err(AppError::BadRequest("Missing movie id.".to_string()));
    };
    let Some(movie) = state.store.get(id).await? else {
        return Err(AppError::NotFound(format!("No movie with id {id} in your collection.")));
    };

    let rating = movie.rating.map(|r| r.to_string()).unwrap_or_default();
    let review = movie.review.clone().unwrap_or_default();
    let (jar, message) = flash::take(jar);
    let body = templates::edit_page(
        movie.id,
        &movie.title,
        &rating,
        &review,
        &FieldErrors::default(),
        message.as_deref(),
    );
    Ok((jar, Html(body)).into_response())
}

/// Stores the chosen search candidate, then sends the user on to rate it.
async fn add_selected(state: &AppState, tmdb_id: i64, jar: CookieJar) -> AppResult<Response> {
    let details = state.tmdb.fetch(tmdb_id).await?;

    if let Some(existing) = state.store.find_by_title(&details.title).await? {
        debug!(tmdb_id = tmdb_id, id = existing.id, "movie already in collection");
        let jar = flash::set(jar, format!("\"{}\" is already in your collection.", existing.title));
        return Ok((jar, Redirect::to(&edit_location(existing.id, &existing.title))).into_response());
    }

    let movie = state.store.insert(&details).await?;

    Ok(Redirect::to(&edit_location(movie.id, &movie.title)).into_response())
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let Some(id) = form.movie_id() else {
        return Err(AppError::BadRequest("Missing or invalid movie id.".to_string()));
    };

    let edit = match form.validate() {
        Ok(edit) => edit,
        Err(errors) => {
            let Some(movie) = state.store.get(id).await? else {
                return Err(AppError::NotFound(format!("No movie with id {id} in your collection.")));
            };
            let body =
                templates::edit_page(id, &movie.title, &form.rating, &form.review, &errors, None);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    let movie = state.store.rate(id, edit.rating, &edit.review).await?;
    state.store.rerank().await?;

    let jar = flash::set(jar, format!("Updated \"{}\".", movie.title));
    Ok((jar, Redirect::to("/")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    id: Option<String>,
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DeleteQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let Some(id) = parse_param::<i32>("id", q.id.as_deref())? else {
        return Err(AppError::BadRequest("Missing movie id.".to_string()));
    };
    let movie = state.store.delete(id).await?;
    state.store.rerank().await?;

    let jar = flash::set(jar, format!("Removed \"{}\".", movie.title));
    Ok((jar, Redirect::to("/")))
}

/// Parses an optional query parameter; an empty value counts as absent.
fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> AppResult<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {name}: {value:?}."))),
    }
}

fn edit_location(id: i32, title: &str) -> String {
    format!("/edit?id={}&title={}", id, urlencoding::encode(title))
}
