use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::integration::idp;
use crate::user::model::UserInfo;

use super::TokenClaims;

#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(config: &idp::Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret().as_bytes()),
            validation,
        }
    }
}

impl AuthService {
    pub fn validate(&self, token: &str) -> super::Result<UserInfo> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(UserInfo::new(
            data.claims.sub,
            data.claims.name,
            data.claims.role,
        ))
    }
}
