use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::{AccessClaims, RefreshClaims};
use crate::auth::dto::TokenPair;
use crate::auth::repo_types::User;
use crate::config::JwtConfig;

/// Signing and verification material for both token families. Two
/// independent secrets and two independent lifetimes: an access token can
/// never pass refresh verification, and vice versa.
#[derive(Clone)]
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::from_secs(config.access_ttl_minutes as u64 * 60),
            refresh_ttl: Duration::from_secs(config.refresh_ttl_minutes as u64 * 60),
        }
    }

    /// Mint an access/refresh pair for the user. Pure function of the user
    /// fields, the clock and the secrets; no I/O happens here.
    pub fn issue(&self, user: &User) -> anyhow::Result<TokenPair> {
        let now = OffsetDateTime::now_utc();
        let access_exp = now + TimeDuration::seconds(self.access_ttl.as_secs() as i64);
        let refresh_exp = now + TimeDuration::seconds(self.refresh_ttl.as_secs() as i64);

        let access = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            iat: now.unix_timestamp() as usize,
            exp: access_exp.unix_timestamp() as usize,
        };
        let refresh = RefreshClaims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: refresh_exp.unix_timestamp() as usize,
        };

        let access_token = encode(&Header::default(), &access, &self.access_encoding)?;
        let refresh_token = encode(&Header::default(), &refresh, &self.refresh_encoding)?;
        debug!(user_id = %user.id, "token pair signed");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?;
        debug!(user_id = %data.claims.sub, "access token verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<RefreshClaims> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?;
        debug!(user_id = %data.claims.sub, "refresh token verified");
        Ok(data.claims)
    }
}
