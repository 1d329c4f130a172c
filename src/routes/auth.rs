use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, AuthenticatedUserId,
        LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::User,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account, marks it logged in, and returns an
/// authentication token.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    // Check if email already exists
    let existing_user =
        sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&register_data.email)
            .bind(&register_data.username)
            .fetch_optional(&**pool)
            .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new user, logged in right away
    let (user_id,) = sqlx::query_as::<_, (i32,)>(
        "INSERT INTO users (username, email, password_hash, is_logged_in)
         VALUES ($1, $2, $3, TRUE) RETURNING id",
    )
    .bind(&register_data.username)
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    // Generate token
    let token = generate_token(user_id)?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user_id }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    // Get user from database
    let user = sqlx::query_as::<_, (i32, String)>(
        "SELECT id, password_hash FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some((user_id, password_hash)) => {
            // Verify password
            if verify_password(&login_data.password, &password_hash)? {
                sqlx::query("UPDATE users SET is_logged_in = TRUE WHERE id = $1")
                    .bind(user_id)
                    .execute(&**pool)
                    .await?;

                let token = generate_token(user_id)?;
                Ok(HttpResponse::Ok().json(AuthResponse { token, user_id }))
            } else {
                Err(AppError::Unauthorized("Invalid credentials".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}

/// Logout user
///
/// Clears the logged-in flag. The token itself simply ages out.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    sqlx::query("UPDATE users SET is_logged_in = FALSE WHERE id = $1")
        .bind(user_id.0)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "User logged out successfully" })))
}

/// Returns the account of the authenticated user.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, is_logged_in, created_at FROM users WHERE id = $1",
    )
    .bind(user_id.0)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
