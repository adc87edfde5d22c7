use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::integration;
use crate::{Raw, Redact};

pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Service = Arc<dyn service::AuthService + Send + Sync>;

/// Bearer token issued by the identity provider for the current session.
#[derive(Deserialize, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Raw for AccessToken {
    fn raw(&self) -> &str {
        &self.0
    }
}

impl Redact for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.redact())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Integration(#[from] integration::Error),
}
