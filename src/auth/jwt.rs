use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Session claims issued by the identity provider. Only the subject is
/// used; it becomes the owner id on every row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

fn validation_for(config: &Config) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    // Pinned iss/aud must be present in the token, not only match when sent.
    let mut required = vec!["exp", "sub"];
    if let Some(issuer) = &config.auth_issuer {
        validation.set_issuer(&[issuer]);
        required.push("iss");
    }
    match &config.auth_audience {
        Some(audience) => {
            validation.set_audience(&[audience]);
            required.push("aud");
        }
        None => validation.validate_aud = false,
    }
    validation.set_required_spec_claims(&required);
    validation
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
        &validation_for(config),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::Unauthorized
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token_data)
}

/// Sign a token the way the identity provider would, for tests.
#[cfg(test)]
pub fn issue_test_token(sub: &str, ttl_secs: i64, config: &Config) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + ttl_secs,
        iat: Some(now),
        iss: config.auth_issuer.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
    )
    .expect("test token must encode")
}
