//! Remote book-search endpoints backed by the Google Books volumes API.
//!
//! Candidates returned here pre-fill the manual-entry form on the client;
//! only the explicit add endpoint writes anything to the collection.

use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    google_books::GoogleBooksClient,
    models::{Book, BookStatus},
    routes::books::insert_book,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;

/// Searches the remote API for candidate records matching the query.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of candidate records.
/// - `404 Not Found`: If the query matches nothing.
/// - `502 Bad Gateway`: If the remote API call fails.
#[get("/search/{query}")]
pub async fn search_books(
    client: web::Data<GoogleBooksClient>,
    query: web::Path<String>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let candidates = client.search(&query).await?;

    if candidates.is_empty() {
        return Err(AppError::NotFound("No books found".into()));
    }

    Ok(HttpResponse::Ok().json(candidates))
}

/// Fetches the details of a single remote volume.
#[get("/google/{google_id}")]
pub async fn get_google_book(
    client: web::Data<GoogleBooksClient>,
    google_id: web::Path<String>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let candidate = client.get(&google_id).await?;
    Ok(HttpResponse::Ok().json(candidate))
}

#[derive(Debug, Deserialize)]
pub struct AddGoogleBookRequest {
    #[serde(default)]
    pub status: BookStatus,
}

/// Adds a remote volume straight to the authenticated user's collection,
/// with a caller-chosen reading status.
#[post("/google/{google_id}")]
pub async fn add_google_book(
    pool: web::Data<PgPool>,
    client: web::Data<GoogleBooksClient>,
    google_id: web::Path<String>,
    payload: web::Json<AddGoogleBookRequest>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let candidate = client.get(&google_id).await?;
    let book = Book::new(candidate.into_record(payload.status), user_id.0);
    let created = insert_book(&pool, book).await?;

    Ok(HttpResponse::Created().json(created))
}
