use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Book, BookInput, BookUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const BOOK_COLUMNS: &str =
    "id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at";

/// Inserts a fully-constructed book row. Shared by manual entry, bulk import,
/// and the add-from-search path.
pub(crate) async fn insert_book(pool: &PgPool, book: Book) -> Result<Book, AppError> {
    let inserted = sqlx::query_as::<_, Book>(
        "INSERT INTO books (id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING id, user_id, title, authors, publish_year, isbn, description, status, created_at, updated_at",
    )
    .bind(book.id)
    .bind(book.user_id)
    .bind(book.title)
    .bind(book.authors)
    .bind(book.publish_year)
    .bind(book.isbn)
    .bind(book.description)
    .bind(book.status)
    .bind(book.created_at)
    .bind(book.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// Retrieves the authenticated user's collection, most recent first.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Book` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
pub async fn get_books(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE user_id = $1 ORDER BY created_at DESC",
        BOOK_COLUMNS
    ))
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(books))
}

/// Adds a book to the authenticated user's collection (manual entry).
///
/// Unlike file import, this path rejects incomplete records: a missing title
/// or an empty author list fails validation before any persistence call.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Book` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation on `BookInput` fails.
/// - `500 Internal Server Error`: For database errors.
#[post("")]
pub async fn create_book(
    pool: web::Data<PgPool>,
    book_data: web::Json<BookInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    book_data.validate()?;

    let book = Book::new(book_data.into_inner().into(), user_id.0);
    let created = insert_book(&pool, book).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Retrieves a single book by its ID.
///
/// The authenticated user must be the owner; someone else's book is
/// indistinguishable from a missing one.
#[get("/{id}")]
pub async fn get_book(
    pool: web::Data<PgPool>,
    book_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let book = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE id = $1",
        BOOK_COLUMNS
    ))
    .bind(book_id.into_inner())
    .fetch_optional(&**pool)
    .await?;

    match book {
        Some(book) if book.user_id == user_id.0 => Ok(HttpResponse::Ok().json(book)),
        _ => Err(AppError::NotFound("Book not found".into())),
    }
}

/// Updates a book owned by the authenticated user.
///
/// The payload is partial: only fields present in the request body are
/// overwritten, everything else keeps its stored value.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Book` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the book does not exist or is not owned by the user.
/// - `422 Unprocessable Entity`: If input validation on `BookUpdate` fails.
/// - `500 Internal Server Error`: For database errors.
#[put("/{id}")]
pub async fn update_book(
    pool: web::Data<PgPool>,
    book_id: web::Path<Uuid>,
    book_data: web::Json<BookUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    book_data.validate()?;
    let book_uuid = book_id.into_inner();

    let existing = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE id = $1",
        BOOK_COLUMNS
    ))
    .bind(book_uuid)
    .fetch_optional(&**pool)
    .await?;

    let mut book = match existing {
        Some(book) if book.user_id == user_id.0 => book,
        _ => return Err(AppError::NotFound("Book not found".into())),
    };

    let update = book_data.into_inner();
    if let Some(title) = update.title {
        book.title = title;
    }
    if let Some(authors) = update.authors {
        if authors.is_empty() {
            return Err(AppError::ValidationError(
                "at least one author is required".into(),
            ));
        }
        book.authors = authors;
    }
    if let Some(publish_year) = update.publish_year {
        book.publish_year = Some(publish_year);
    }
    if let Some(isbn) = update.isbn {
        book.isbn = isbn;
    }
    if let Some(description) = update.description {
        book.description = description;
    }
    if let Some(status) = update.status {
        book.status = status;
    }

    let updated = sqlx::query_as::<_, Book>(&format!(
        "UPDATE books
         SET title = $1, authors = $2, publish_year = $3, isbn = $4, description = $5,
             status = $6, updated_at = NOW()
         WHERE id = $7 AND user_id = $8
         RETURNING {}",
        BOOK_COLUMNS
    ))
    .bind(&book.title)
    .bind(&book.authors)
    .bind(book.publish_year)
    .bind(&book.isbn)
    .bind(&book.description)
    .bind(book.status)
    .bind(book_uuid)
    .bind(user_id.0)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a book owned by the authenticated user.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the book does not exist or is not owned by the user.
#[delete("/{id}")]
pub async fn delete_book(
    pool: web::Data<PgPool>,
    book_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM books WHERE id = $1 AND user_id = $2")
        .bind(book_id.into_inner())
        .bind(user_id.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Book not found or not owned by user".into(),
        ));
    }

    Ok(HttpResponse::NoContent().finish())
}
