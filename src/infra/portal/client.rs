//! The portal client: CAS login, session restore, authenticated API calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use reqwest::cookie::Jar;
use serde_json::Value;
use tracing::debug;
use url::Url;

use sis_grade_watch::fetch::{BasicClient, auth::CsrfSession, fetch_json};
use crate::services::student_api::StudentApi;

use super::PortalError;
use super::cas::{extract_cas_tokens, extract_csrf};
use super::session::SavedSession;

const DEFAULT_SSO_URL: &str = "https://sso.uom.gr/login";
const DEFAULT_PORTAL_URL: &str = "https://sis-portal.uom.gr";

const STUDENT_DATA_PATH: &str = "/feign/student/student_data";
const GRADES_PATH: &str = "/feign/student/grades/all";

/// SSO and portal bases, overridable for other deployments of the same SIS.
fn endpoints() -> (String, String) {
    let sso = std::env::var("SIS_SSO_URL").unwrap_or_else(|_| DEFAULT_SSO_URL.to_string());
    let portal = std::env::var("SIS_PORTAL_URL").unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string());
    (sso, portal.trim_end_matches('/').to_string())
}

/// An authenticated portal session.
///
/// Constructed through [`PortalClient::login`] (full CAS dance) or
/// [`PortalClient::restore`] (saved session revalidated against the
/// student-data endpoint).
pub struct PortalClient {
    api: CsrfSession<BasicClient>,
    jar: Arc<Jar>,
    portal_base: String,
    portal_url: Url,
    data_dir: PathBuf,
    csrf: String,
    profile_id: String,
}

impl PortalClient {
    /// Runs the CAS single-sign-on flow and persists the resulting session.
    pub async fn login(
        username: &str,
        password: &str,
        data_dir: &Path,
    ) -> Result<Self, PortalError> {
        let (sso_url, portal_base) = endpoints();
        let portal_url: Url = portal_base.parse()?;
        let service_url = format!("{portal_base}/login/cas");

        let jar = Arc::new(Jar::default());
        let http = BasicClient::with_jar(jar.clone());

        // Hit the portal first to pick up its initial cookies
        http.inner().get(&portal_base).send().await?;

        debug!(sso = %sso_url, "Loading CAS login page");
        let login_page = http
            .inner()
            .get(&sso_url)
            .query(&[("service", service_url.as_str())])
            .send()
            .await?;
        let login_url = login_page.url().to_string();
        let login_html = login_page.text().await?;

        let (execution, lt) = extract_cas_tokens(&login_html)?;

        let mut form: Vec<(&str, String)> = vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
            ("execution", execution),
            ("_eventId", "submit".to_string()),
        ];
        if let Some(lt_val) = lt {
            form.push(("lt", lt_val));
        }

        let resp = http
            .inner()
            .post(&sso_url)
            .query(&[("service", service_url.as_str())])
            .form(&form)
            .header("Referer", &login_url)
            .send()
            .await?;

        // A successful login redirects away from the SSO host
        let sso_host = Url::parse(&sso_url).ok().and_then(|u| u.host_str().map(String::from));
        if resp.url().host_str().map(String::from) == sso_host {
            return Err(PortalError::InvalidCredentials {
                final_url: resp.url().to_string(),
            });
        }

        let portal_html = http.inner().get(&portal_base).send().await?.text().await?;
        let csrf = extract_csrf(&portal_html)?;

        debug!("Fetching student profiles");
        let profiles: Value = http
            .inner()
            .get(format!("{portal_base}/api/person/profiles"))
            .header("X-CSRF-TOKEN", &csrf)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?
            .json()
            .await?;
        let profile_id = find_profile_id(&profiles).ok_or(PortalError::ProfileMissing)?;

        let client = Self::assemble(jar, portal_base, portal_url, csrf, profile_id, data_dir);

        // Verify the session actually works before persisting it
        client
            .api_get(STUDENT_DATA_PATH)
            .await
            .map_err(|_| PortalError::SessionExpired)?;
        client.persist()?;

        Ok(client)
    }

    /// Revives the session saved by a previous login. Deletes the saved
    /// session when the portal no longer accepts it.
    pub async fn restore(data_dir: &Path) -> Result<Self, PortalError> {
        let saved = SavedSession::load(data_dir)?;
        let (_, portal_base) = endpoints();
        let portal_url: Url = portal_base.parse()?;

        let jar = saved.seed_jar(&portal_url);
        let client = Self::assemble(
            jar,
            portal_base,
            portal_url,
            saved.csrf,
            saved.profile_id,
            data_dir,
        );

        if client.api_get(STUDENT_DATA_PATH).await.is_err() {
            SavedSession::delete(data_dir);
            return Err(PortalError::SessionExpired);
        }

        Ok(client)
    }

    /// Forgets the saved session.
    pub fn logout(data_dir: &Path) {
        SavedSession::delete(data_dir);
    }

    fn assemble(
        jar: Arc<Jar>,
        portal_base: String,
        portal_url: Url,
        csrf: String,
        profile_id: String,
        data_dir: &Path,
    ) -> Self {
        let api = CsrfSession::new(BasicClient::with_jar(jar.clone()), csrf.clone(), profile_id.clone());
        PortalClient {
            api,
            jar,
            portal_base,
            portal_url,
            data_dir: data_dir.to_path_buf(),
            csrf,
            profile_id,
        }
    }

    fn persist(&self) -> Result<(), PortalError> {
        SavedSession::capture(&self.jar, &self.portal_url, &self.csrf, &self.profile_id)
            .save(&self.data_dir)
    }

    async fn api_get(&self, path: &str) -> Result<Value> {
        fetch_json(&self.api, &format!("{}{}", self.portal_base, path)).await
    }
}

#[async_trait::async_trait]
impl StudentApi for PortalClient {
    async fn student_info(&self) -> Result<Value> {
        self.api_get(STUDENT_DATA_PATH).await
    }

    async fn grades(&self) -> Result<Value> {
        self.api_get(GRADES_PATH).await
    }

    async fn grade_distribution(
        &self,
        course_syllabus_id: &str,
        exam_period_id: &str,
    ) -> Result<Value> {
        let path = format!(
            "/feign/student/grades/stats/course_syllabus/{course_syllabus_id}/exam_period/{exam_period_id}"
        );
        self.api_get(&path).await
    }
}

/// Digs the first profile id out of the profiles payload, whose nesting
/// varies between portal versions.
fn find_profile_id(value: &Value) -> Option<String> {
    fn extract_id(v: &Value) -> Option<String> {
        v.get("id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    match value {
        Value::Object(map) => {
            for v in map.values() {
                if let Some(id) = find_profile_id(v) {
                    return Some(id);
                }
            }
            extract_id(value)
        }
        Value::Array(arr) => arr.first().and_then(extract_id),
        _ => None,
    }
}
