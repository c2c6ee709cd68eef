use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod model;

/// Subject claim of the identity provider, the stable user id.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Sub(pub String);

impl Sub {
    /// Subs end up as keys in the per-conversation counter map, where `.`
    /// and a leading `$` change the meaning of an update path. Such subs
    /// are rejected at the service boundary.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && !self.0.contains('.') && !self.0.starts_with('$')
    }
}

impl Display for Sub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Sub {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sub {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Sub, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Sub(s))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Owner,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Student => "student",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sub_is_well_formed() {
        assert!(Sub("auth0|64f1a2".into()).is_well_formed());
        assert!(Sub("a1".into()).is_well_formed());
    }

    #[test]
    fn path_metacharacters_are_rejected() {
        assert!(!Sub("a.b".into()).is_well_formed());
        assert!(!Sub("$gt".into()).is_well_formed());
        assert!(!Sub(String::new()).is_well_formed());
    }
}
