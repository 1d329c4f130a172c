//! HTTP surface of the import/export pipeline.
//!
//! Import is a two-step exchange. `preview` runs parse + normalize and hands
//! the staged records back without persisting anything; the client shows them
//! for confirmation (or discards them, which costs the server nothing).
//! `commit` takes the confirmed records and submits one independent create
//! per record. Export is the single-step inverse.

use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    formats::{export_books, normalize_books, parse_books, BookFormat},
    models::{Book, NewBook},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use super::books::insert_book;

#[derive(Debug, Deserialize)]
pub struct FormatParam {
    pub format: BookFormat,
}

#[derive(Debug, Deserialize)]
pub struct ImportCommitRequest {
    pub books: Vec<NewBook>,
}

/// Parses and normalizes an uploaded collection file without persisting it.
///
/// The body is the raw file text; the format is chosen explicitly by the
/// caller, never sniffed from content. A parse failure returns 400 with the
/// parser's message and stages nothing.
#[post("/import/preview")]
pub async fn preview_import(
    query: web::Query<FormatParam>,
    body: String,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let raw = parse_books(&body, query.format)?;
    let books = normalize_books(raw);
    let count = books.len();

    Ok(HttpResponse::Ok().json(json!({
        "books": books,
        "count": count
    })))
}

/// Persists a confirmed list of staged records.
///
/// Every record is submitted as an independent create, all fired
/// concurrently. There is no transaction and no rollback: a failure at
/// record k leaves earlier records persisted and later ones still attempted.
/// The response reports aggregate counts only, never per-record attribution.
#[post("/import/commit")]
pub async fn commit_import(
    pool: web::Data<PgPool>,
    payload: web::Json<ImportCommitRequest>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let records = payload.into_inner().books;
    if records.is_empty() {
        return Err(AppError::BadRequest("No records to import".into()));
    }

    let total = records.len();
    let inserts = records.into_iter().map(|record| {
        let pool = pool.clone();
        async move {
            let book = Book::new(record, user_id.0);
            insert_book(&pool, book).await
        }
    });

    let results = join_all(inserts).await;
    let imported = results.iter().filter(|r| r.is_ok()).count();
    let failed = total - imported;

    if failed > 0 {
        log::warn!(
            "bulk import for user {}: {} of {} records failed",
            user_id.0,
            failed,
            total
        );
    }

    Ok(HttpResponse::Ok().json(json!({
        "imported": imported,
        "failed": failed
    })))
}

/// Serializes the authenticated user's collection for download.
#[get("/export")]
pub async fn export_collection(
    pool: web::Data<PgPool>,
    query: web::Query<FormatParam>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at
         FROM books WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    let file = export_books(&books, query.format, "my_books")?;

    Ok(HttpResponse::Ok()
        .content_type(file.mime_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.content))
}
