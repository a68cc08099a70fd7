//! Authentication service for registration, login, and token issuance

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::Claims;
use shared::models::UserRole;
use shared::validation::{validate_college_id, validate_indian_phone};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for registering a student account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub college_id: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

/// Input for registering a seller with their store
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterSellerInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub store_name: String,
    #[validate(length(min = 1, max = 200))]
    pub store_address: String,
    pub phone_number: String,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response after registration or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
    /// Student profile id for students, store id for sellers
    pub profile_id: Uuid,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Register a student account with its profile
    pub async fn register_student(&self, input: RegisterStudentInput) -> AppResult<AuthResponse> {
        input.validate()?;
        validate_college_id(&input.college_id).map_err(|msg| AppError::Validation {
            field: "college_id".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(ref phone) = input.phone {
            validate_indian_phone(phone).map_err(|msg| AppError::Validation {
                field: "phone".to_string(),
                message: msg.to_string(),
            })?;
        }

        self.ensure_email_free(&input.email).await?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'student')
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let profile_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO student_profiles (user_id, college_id, phone, department)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&input.college_id)
        .bind(&input.phone)
        .bind(&input.department)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Registered student account {}", user_id);
        self.auth_response(user_id, input.name, UserRole::Student, profile_id)
    }

    /// Register a seller account together with their store
    pub async fn register_seller(&self, input: RegisterSellerInput) -> AppResult<AuthResponse> {
        input.validate()?;
        validate_indian_phone(&input.phone_number).map_err(|msg| AppError::Validation {
            field: "phone_number".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_email_free(&input.email).await?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'seller')
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let store_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stores (seller_id, name, address, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&input.store_name)
        .bind(&input.store_address)
        .bind(&input.phone_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Registered seller account {} with store {}", user_id, store_id);
        self.auth_response(user_id, input.name, UserRole::Seller, store_id)
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let row = sqlx::query_as::<_, (Uuid, String, String, String)>(
            "SELECT id, name, password_hash, role FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.2)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = UserRole::from_str(&row.3)
            .ok_or_else(|| AppError::Internal(format!("Unknown role '{}'", row.3)))?;

        let profile_id = match role {
            UserRole::Student => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM student_profiles WHERE user_id = $1",
                )
                .bind(row.0)
                .fetch_one(&self.db)
                .await?
            }
            UserRole::Seller => {
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM stores WHERE seller_id = $1")
                    .bind(row.0)
                    .fetch_one(&self.db)
                    .await?
            }
        };

        self.auth_response(row.0, row.1, role, profile_id)
    }

    async fn ensure_email_free(&self, email: &str) -> AppResult<()> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }
        Ok(())
    }

    fn auth_response(
        &self,
        user_id: Uuid,
        name: String,
        role: UserRole,
        profile_id: Uuid,
    ) -> AppResult<AuthResponse> {
        let access_token = self.issue_token(user_id, role, profile_id)?;
        Ok(AuthResponse {
            user_id,
            name,
            role,
            profile_id,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn issue_token(&self, user_id: Uuid, role: UserRole, profile_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            profile_id: profile_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }
}
