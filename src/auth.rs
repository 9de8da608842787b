//! Bearer token verification and role checks.
//!
//! Tokens are issued elsewhere; this service only verifies the HS256
//! signature and reads the `sub` and `role` claims.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppState;

/// Access roles carried in the `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Vet,
    Staff,
    Customer,
}

impl Role {
    /// Unknown or missing roles are treated as customers
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("admin") => Role::Admin,
            Some("vet") => Role::Vet,
            Some("staff") => Role::Staff,
            _ => Role::Customer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// Authenticated caller extracted from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with 403 unless the caller holds `role`
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, role = ?self.role, required = ?role, "Role check failed");
            Err(AppError::Forbidden)
        }
    }
}

/// Verify a bearer token against the shared secret
pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized
        })?;

    Ok(AuthUser {
        role: Role::from_claim(data.claims.role.as_deref()),
        user_id: data.claims.sub,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        verify_token(token, &state.config.jwt_secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(role: Option<&str>, exp_offset: i64) -> String {
        let claims = Claims {
            sub: "42".to_string(),
            role: role.map(str::to_string),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn test_role_from_claim() {
        assert_eq!(Role::from_claim(Some("admin")), Role::Admin);
        assert_eq!(Role::from_claim(Some("VET")), Role::Vet);
        assert_eq!(Role::from_claim(Some("staff")), Role::Staff);
        assert_eq!(Role::from_claim(Some("zookeeper")), Role::Customer);
        assert_eq!(Role::from_claim(None), Role::Customer);
    }

    #[test]
    fn test_verify_token() {
        let user = verify_token(&token(Some("admin"), 3600), SECRET).unwrap();
        assert_eq!(user.user_id, "42");
        assert!(user.is_admin());
        assert!(user.require(Role::Admin).is_ok());
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let result = verify_token(&token(Some("admin"), 3600), "other-secret");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_token_expired() {
        let result = verify_token(&token(None, -3600), SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_customer_cannot_act_as_admin() {
        let user = verify_token(&token(Some("customer"), 3600), SECRET).unwrap();
        assert!(matches!(user.require(Role::Admin), Err(AppError::Forbidden)));
    }
}
