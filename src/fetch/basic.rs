use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;

use super::client::HttpClient;

/// Plain [`HttpClient`] over a `reqwest::Client`.
///
/// The portal authenticates through a cookie session, so the client is
/// always built around an externally-owned cookie jar and the browser user
/// agent the portal expects.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self::with_jar(Arc::new(Jar::default()))
    }

    /// Builds a client sharing `jar`, so callers can seed cookies from a
    /// saved session or read them back for persistence.
    pub fn with_jar(jar: Arc<Jar>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .user_agent(super::USER_AGENT)
            .build()
            .expect("BasicClient: HTTP client build failed");
        Self(client)
    }

    /// The underlying `reqwest::Client`, for request shapes the
    /// [`HttpClient`] seam does not cover (form posts during login).
    pub fn inner(&self) -> &reqwest::Client {
        &self.0
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
