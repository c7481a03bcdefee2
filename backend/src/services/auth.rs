//! Admin authentication and the export password gate

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::store::ReportStore;

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    store: S,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin ID
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl<S: ReportStore> AuthService<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self::with_secret(store, &config.jwt.secret, config.jwt.access_token_expiry)
    }

    pub fn with_secret(store: S, jwt_secret: &str, access_token_expiry: i64) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.to_string(),
            access_token_expiry,
        }
    }

    /// Authenticate an admin with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let admin = self
            .store
            .find_admin_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &admin.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(admin_id = %admin.id, "Admin signed in");
        self.generate_token(admin.id, &admin.email)
    }

    /// Re-check the signed-in admin's password before an export.
    ///
    /// A wrong password is [`AppError::ExportDenied`]; failing to read or
    /// check the stored credential is [`AppError::ExportFailed`].
    pub async fn verify_export_password(&self, admin_id: Uuid, password: &str) -> AppResult<()> {
        let admin = self
            .store
            .find_admin_by_id(admin_id)
            .await
            .map_err(|e| AppError::ExportFailed(format!("Credential lookup failed: {}", e)))?
            .ok_or_else(|| AppError::ExportFailed("Admin credential not found".to_string()))?;

        let valid = verify(password, &admin.password_hash)
            .map_err(|e| AppError::ExportFailed(format!("Password verification failed: {}", e)))?;

        if valid {
            Ok(())
        } else {
            tracing::warn!(admin_id = %admin_id, "Export password rejected");
            Err(AppError::ExportDenied)
        }
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    pub(crate) fn generate_token(&self, admin_id: Uuid, email: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
