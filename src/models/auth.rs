//! Authenticated user extracted from the auth service's JWT.
//!
//! Authentication itself lives in a separate service; this module only
//! validates the token it issued and exposes the claims to handlers.

use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Cookie set by the auth service after sign-in.
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject identifier assigned by the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub tenant_id: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoded = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(decoded.claims)
    }

    pub fn to_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            self,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .cookie(AUTH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .or_else(|| bearer_token(req));

        let result = match (token, req.app_data::<web::Data<ServerConfig>>()) {
            (Some(token), Some(config)) => {
                AuthenticatedUser::from_token(&token, &config.secret)
                    .map_err(|_| ErrorUnauthorized("Invalid token"))
            }
            (None, _) => Err(ErrorUnauthorized("Missing token")),
            (_, None) => Err(ErrorUnauthorized("Server misconfigured")),
        };

        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "ana@service.ro".to_string(),
            name: "Ana".to_string(),
            tenant_id: "tenant-1".to_string(),
            roles: vec!["tenant_owner".to_string()],
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = user.to_token("secret").unwrap();
        let decoded = AuthenticatedUser::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.email, user.email);
        assert_eq!(decoded.tenant_id, user.tenant_id);
        assert_eq!(decoded.roles, user.roles);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sample_user().to_token("secret").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut user = sample_user();
        user.exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        let token = user.to_token("secret").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "secret").is_err());
    }
}
