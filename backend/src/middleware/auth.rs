//! Authentication middleware
//!
//! Validates the admin's Bearer token and exposes the session to handlers

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{AuthService, PgReportStore};
use crate::AppState;

/// Authenticated admin extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub admin_id: Uuid,
    pub email: String,
}

/// Authentication middleware that validates JWT tokens against the
/// configured signing secret
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &request) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn authenticate(state: &AppState, request: &Request) -> AppResult<AuthUser> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing or invalid Authorization header".to_string(),
        })?;

    let claims = AuthService::new(PgReportStore::new(state.db.clone()), &state.config)
        .validate_token(token)?;

    let admin_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized {
        message: "Invalid admin ID in token".to_string(),
    })?;

    Ok(AuthUser {
        admin_id,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DatabaseConfig, JwtConfig, ReportingConfig, ServerConfig};
    use crate::services::store::memory::MemoryStore;

    const SECRET: &str = "file-configured-secret";

    fn state() -> AppState {
        let config = Config {
            environment: "test".to_string(),
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/mpr_test".to_string(),
                max_connections: 1,
                min_connections: 0,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
                access_token_expiry: 600,
            },
            reporting: ReportingConfig::default(),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        AppState {
            db,
            config: Arc::new(config),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/", get(|Extension(user): Extension<AuthUser>| async move { user.email }))
            .route_layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    fn token(secret: &str) -> String {
        let admin_id = Uuid::parse_str("8f14e45f-ceea-467f-a8f5-2b0c3e0d5a11").unwrap();
        AuthService::with_secret(MemoryStore::default(), secret, 600)
            .generate_token(admin_id, "admin@shop.lk")
            .unwrap()
            .access_token
    }

    async fn call(state: AppState, authorization: Option<String>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app(state)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_token_signed_with_configured_secret_is_accepted() {
        let (status, body) = call(state(), Some(format!("Bearer {}", token(SECRET)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin@shop.lk");
    }

    #[tokio::test]
    async fn test_foreign_or_missing_token_is_rejected() {
        let (status, body) = call(state(), Some(format!("Bearer {}", token("other")))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("INVALID_TOKEN"));

        let (status, body) = call(state(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing or invalid Authorization header"));
    }
}
