//! Session persistence: cookies, CSRF token, and profile id survive across
//! runs as `session.json` in the data dir.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::cookie::{CookieStore as _, Jar};
use serde::{Deserialize, Serialize};
use url::Url;

use super::PortalError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedSession {
    pub portal_cookies: String,
    pub csrf: String,
    pub profile_id: String,
}

fn session_path(dir: &Path) -> PathBuf {
    dir.join("session.json")
}

impl SavedSession {
    /// Snapshots the jar's cookies for the portal origin.
    pub fn capture(jar: &Jar, portal_url: &Url, csrf: &str, profile_id: &str) -> Self {
        let portal_cookies = jar
            .cookies(portal_url)
            .and_then(|h| h.to_str().ok().map(|s| s.to_string()))
            .unwrap_or_default();

        SavedSession {
            portal_cookies,
            csrf: csrf.to_string(),
            profile_id: profile_id.to_string(),
        }
    }

    /// Seeds a fresh jar with the saved cookies, scoped to the portal host.
    pub fn seed_jar(&self, portal_url: &Url) -> Arc<Jar> {
        let jar = Arc::new(Jar::default());
        let host = portal_url.host_str().unwrap_or_default();

        for part in self.portal_cookies.split("; ") {
            if !part.is_empty() {
                let set_cookie = format!("{part}; Domain={host}; Path=/");
                jar.add_cookie_str(&set_cookie, portal_url);
            }
        }

        jar
    }

    pub fn save(&self, dir: &Path) -> Result<(), PortalError> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(session_path(dir), serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Loads the saved session; a missing file means nobody is logged in.
    pub fn load(dir: &Path) -> Result<SavedSession, PortalError> {
        let data =
            std::fs::read_to_string(session_path(dir)).map_err(|_| PortalError::NotLoggedIn)?;
        let saved: SavedSession =
            serde_json::from_str(&data).map_err(|_| PortalError::NotLoggedIn)?;

        if saved.portal_cookies.is_empty() {
            return Err(PortalError::NotLoggedIn);
        }
        Ok(saved)
    }

    pub fn delete(dir: &Path) {
        let _ = std::fs::remove_file(session_path(dir));
    }
}
