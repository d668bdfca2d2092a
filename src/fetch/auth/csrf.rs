use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that stamps every request with the portal's
/// session headers.
///
/// The portal API authenticates AJAX calls with a CSRF token scraped from
/// the dashboard page plus the active student-profile id; both travel as
/// headers on top of the session cookies held by the inner client.
pub struct CsrfSession<C> {
    pub inner: C,
    pub csrf: String,
    pub profile_id: String,
}

impl<C> CsrfSession<C> {
    pub fn new(inner: C, csrf: String, profile_id: String) -> Self {
        Self {
            inner,
            csrf,
            profile_id,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for CsrfSession<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let headers = req.headers_mut();
        headers.insert(
            "X-CSRF-TOKEN",
            self.csrf.parse().expect("CsrfSession: invalid CSRF token"),
        );
        headers.insert(
            "X-Profile",
            self.profile_id
                .parse()
                .expect("CsrfSession: invalid profile id"),
        );
        headers.insert("X-Requested-With", "XMLHttpRequest".parse().unwrap());
        headers.insert("Accept", "application/json".parse().unwrap());
        self.inner.execute(req).await
    }
}
