//! The one session object every data-access call receives.
//!
//! Tokens live here and nowhere else; the API client reads the bearer
//! through this handle and installs refreshed tokens back through it, so
//! refresh-and-retry stays encapsulated in one module.

use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Clone, Debug)]
pub struct Session {
    pub store_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Shared, mutable session handle. Cheap to clone; all clones observe the
/// same token state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn store_id(&self) -> String {
        self.inner.read().await.store_id.clone()
    }

    pub async fn access_token(&self) -> String {
        self.inner.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> String {
        self.inner.read().await.refresh_token.clone()
    }

    /// Install the token pair returned by a refresh.
    pub async fn install_tokens(&self, access_token: String, refresh_token: String) {
        let mut session = self.inner.write().await;
        session.access_token = access_token;
        session.refresh_token = refresh_token;
    }
}
