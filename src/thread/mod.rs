use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod model;

/// Opaque thread identifier, assigned by the remote store at insert time.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Id(pub String);

impl Id {
    /// Client-side id, for fakes standing in for the remote store.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl crate::Raw for Id {
    fn raw(&self) -> &str {
        &self.0
    }
}
