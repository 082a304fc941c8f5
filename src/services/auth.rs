// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Claims, SessionContext},
};

/// Valida os tokens do serviço de autenticação hospedado.
/// O login em si acontece fora deste backend.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    audience: Option<String>,
}

impl AuthService {
    pub fn new(jwt_secret: String, audience: Option<String>) -> Self {
        Self { jwt_secret, audience }
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionContext, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })?;

        Ok(SessionContext {
            user_id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }

    /// Emite um token no mesmo formato do serviço de autenticação (scripts e testes).
    pub fn issue_token(&self, user_id: Uuid, email: Option<&str>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(1);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: Some(now.timestamp() as usize),
            email: email.map(str::to_string),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
