use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::RwLock;

use crate::integration::idp::IdentityProvider;
use crate::user::model::UserInfo;

/// Identity surface consumed by the synchronization core.
///
/// The provider is authoritative; this service only caches the fetched
/// profile for the lifetime of the session. "No user" is an ordinary state
/// (unauthenticated), not an error.
#[async_trait]
pub trait AuthService {
    /// Cached profile, fetched once from the provider on first use.
    async fn current_user(&self) -> Option<UserInfo>;

    /// Re-fetch the profile from the provider and install it in the session.
    async fn refresh(&self) -> super::Result<Option<UserInfo>>;

    /// Sign out at the provider, then clear the session.
    async fn sign_out(&self) -> super::Result<()>;
}

#[derive(Clone)]
pub struct AuthServiceImpl {
    idp: Arc<dyn IdentityProvider + Send + Sync>,
    session: Arc<RwLock<Option<UserInfo>>>,
}

impl AuthServiceImpl {
    pub fn new(idp: Arc<dyn IdentityProvider + Send + Sync>) -> Self {
        Self {
            idp,
            session: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn current_user(&self) -> Option<UserInfo> {
        if let Some(user) = self.session.read().await.clone() {
            return Some(user);
        }

        match self.refresh().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not resolve current user: {e}");
                None
            }
        }
    }

    async fn refresh(&self) -> super::Result<Option<UserInfo>> {
        let user = self.idp.fetch_user().await?;

        match &user {
            Some(u) => debug!("Session established for sub '{}'", u.sub),
            None => debug!("No authenticated user"),
        }

        *self.session.write().await = user.clone();
        Ok(user)
    }

    async fn sign_out(&self) -> super::Result<()> {
        self.idp.sign_out().await?;
        *self.session.write().await = None;

        debug!("Session cleared");
        Ok(())
    }
}
