//! Friend management: finding users, maintaining the friends list, and
//! viewing or exporting a friend's collection.

use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    formats::export_books,
    models::{Book, UserSummary},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

use super::import_export::FormatParam;

async fn friendship_exists(
    pool: &PgPool,
    user_id: i32,
    friend_id: i32,
) -> Result<bool, AppError> {
    let row = sqlx::query_as::<_, (i32,)>(
        "SELECT 1 FROM friendships WHERE user_id = $1 AND friend_id = $2",
    )
    .bind(user_id)
    .bind(friend_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Searches registered users by username or email fragment,
/// excluding the caller.
#[get("/search/{query}")]
pub async fn search_users(
    pool: web::Data<PgPool>,
    query: web::Path<String>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let pattern = format!("%{}%", query.into_inner());

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, username, email FROM users
         WHERE (username ILIKE $1 OR email ILIKE $1) AND id <> $2
         ORDER BY username",
    )
    .bind(&pattern)
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Lists the authenticated user's friends.
#[get("/friends")]
pub async fn get_friends(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let friends = sqlx::query_as::<_, UserSummary>(
        "SELECT u.id, u.username, u.email
         FROM friendships f
         JOIN users u ON u.id = f.friend_id
         WHERE f.user_id = $1
         ORDER BY u.username",
    )
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(friends))
}

/// Adds another user to the caller's friends list.
///
/// ## Responses:
/// - `201 Created`: The friendship was recorded.
/// - `400 Bad Request`: Self-friending or an already-existing friendship.
/// - `404 Not Found`: The target user does not exist.
#[post("/friends/{friend_id}")]
pub async fn add_friend(
    pool: web::Data<PgPool>,
    friend_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let friend_id = friend_id.into_inner();

    if friend_id == user_id.0 {
        return Err(AppError::BadRequest(
            "Cannot add yourself as a friend".into(),
        ));
    }

    let exists = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE id = $1")
        .bind(friend_id)
        .fetch_optional(&**pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }

    let result = sqlx::query(
        "INSERT INTO friendships (user_id, friend_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(user_id.0)
    .bind(friend_id)
    .execute(&**pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Already friends".into()));
    }

    Ok(HttpResponse::Created().json(json!({ "message": "Friend added successfully" })))
}

/// Removes a user from the caller's friends list.
#[delete("/friends/{friend_id}")]
pub async fn remove_friend(
    pool: web::Data<PgPool>,
    friend_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM friendships WHERE user_id = $1 AND friend_id = $2")
        .bind(user_id.0)
        .bind(friend_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Friend not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Friend removed successfully" })))
}

/// Lists a friend's collection. Only collections of confirmed friends are
/// visible; anyone else's is indistinguishable from a missing user.
#[get("/friends/{friend_id}/books")]
pub async fn get_friend_books(
    pool: web::Data<PgPool>,
    friend_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let friend_id = friend_id.into_inner();

    if !friendship_exists(&pool, user_id.0, friend_id).await? {
        return Err(AppError::NotFound("Friend not found".into()));
    }

    let books = sqlx::query_as::<_, Book>(
        "SELECT id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at
         FROM books WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(friend_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(books))
}

/// Serializes a friend's collection for download, in any of the three
/// export formats.
#[get("/friends/{friend_id}/books/export")]
pub async fn export_friend_books(
    pool: web::Data<PgPool>,
    friend_id: web::Path<i32>,
    query: web::Query<FormatParam>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let friend_id = friend_id.into_inner();

    if !friendship_exists(&pool, user_id.0, friend_id).await? {
        return Err(AppError::NotFound("Friend not found".into()));
    }

    let books = sqlx::query_as::<_, Book>(
        "SELECT id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at
         FROM books WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(friend_id)
    .fetch_all(&**pool)
    .await?;

    let file = export_books(&books, query.format, "friend_books")?;

    Ok(HttpResponse::Ok()
        .content_type(file.mime_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.content))
}
