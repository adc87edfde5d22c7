use serde::{Deserialize, Serialize};

use super::Sub;

/// Profile returned by the identity provider's userinfo endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserInfo {
    pub sub: Sub,
    pub name: String,
    pub email: String,
}

impl UserInfo {
    pub fn new(sub: Sub, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            sub,
            name: name.into(),
            email: email.into(),
        }
    }
}
