use std::env;

/// Identity-provider trust anchors. The provider itself is an external
/// collaborator; this service only verifies what it signed.
#[derive(Clone)]
pub struct Config {
    secret: String,
    issuer: String,
    audience: String,
}

impl Config {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            issuer: env::var("JWT_ISSUER").unwrap_or("hostelhub".into()),
            audience: env::var("JWT_AUDIENCE").unwrap_or("hostelhub-app".into()),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}
