use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use tokio::sync::RwLock;

use crate::Raw;
use crate::auth::AccessToken;
use crate::user::model::UserInfo;

/// Seam to the hosted authentication service.
///
/// The core only ever asks two things of it: who the current user is, and to
/// end the session. Anything token-shaped stays behind this trait.
#[async_trait]
pub trait IdentityProvider {
    /// `Ok(None)` means unauthenticated, which is an ordinary state.
    async fn fetch_user(&self) -> super::Result<Option<UserInfo>>;

    async fn sign_out(&self) -> super::Result<()>;
}

#[derive(Clone)]
pub struct Config {
    userinfo_url: String,
    signout_url: String,
}

impl Config {
    /// `base_url` is the provider's auth endpoint root, trailing slash included.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            userinfo_url: format!("{base_url}userinfo"),
            signout_url: format!("{base_url}signout"),
        }
    }

    pub fn userinfo_url(&self) -> &str {
        &self.userinfo_url
    }

    pub fn signout_url(&self) -> &str {
        &self.signout_url
    }
}

#[derive(Clone)]
pub struct IdpClient {
    cfg: Config,
    http: Arc<reqwest::Client>,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl IdpClient {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            http: Arc::new(super::init_http_client()),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Installs the access token obtained by the host application's login flow.
    pub async fn set_token(&self, token: Option<AccessToken>) {
        *self.token.write().await = token;
    }
}

#[async_trait]
impl IdentityProvider for IdpClient {
    async fn fetch_user(&self) -> super::Result<Option<UserInfo>> {
        let Some(token) = self.token.read().await.clone() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.cfg.userinfo_url())
            .bearer_auth(token.raw())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Userinfo request rejected, treating session as expired");
            return Ok(None);
        }

        let user = response.error_for_status()?.json::<UserInfo>().await?;
        Ok(Some(user))
    }

    async fn sign_out(&self) -> super::Result<()> {
        // Local session ends even if the revocation round trip fails later.
        let token = self.token.write().await.take();

        if let Some(token) = token {
            self.http
                .post(self.cfg.signout_url())
                .bearer_auth(token.raw())
                .send()
                .await?
                .error_for_status()?;

            debug!("Session revoked at the identity provider");
        }

        Ok(())
    }
}
