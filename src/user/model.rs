use super::{Role, Sub};

/// Authenticated caller identity, taken from validated token claims.
/// The messaging service trusts it and never re-derives it.
#[derive(Clone, Debug)]
pub struct UserInfo {
    pub sub: Sub,
    pub name: String,
    pub role: Role,
}

impl UserInfo {
    pub fn new(sub: Sub, name: impl Into<String>, role: Role) -> Self {
        Self {
            sub,
            name: name.into(),
            role,
        }
    }
}
