use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "Username and password are required.".to_string(),
        ));
    }

    let existing = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(AppError::reservation)?;
    if existing.is_some() {
        return Err(AppError::ValidationError("Username already exists.".to_string()));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;

    let user = state
        .users
        .create(&req.username, &password_hash)
        .await
        .map_err(AppError::reservation)?;

    info!("User registered: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".to_string(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "Username and password are required.".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(AppError::reservation)?
        .ok_or_else(|| AppError::AuthenticationError("Invalid credentials.".to_string()))?;

    let matches = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !matches {
        return Err(AppError::AuthenticationError("Invalid credentials.".to_string()));
    }

    let my_claims = CustomerClaims {
        sub: user.id.to_string(),
        username: user.username,
        role: user.role,
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &my_claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}
