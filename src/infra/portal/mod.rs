//! Client for the university SIS portal.
//!
//! [`PortalClient`] drives the CAS single-sign-on dance, keeps the cookie
//! session plus CSRF token, persists them across runs, and implements
//! [`crate::services::student_api::StudentApi`] over the portal's feign
//! endpoints.

mod cas;
mod client;
mod session;

pub use client::PortalClient;
pub use session::SavedSession;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("not logged in; run `login` first")]
    NotLoggedIn,
    #[error("invalid username or password (ended at {final_url})")]
    InvalidCredentials { final_url: String },
    #[error("saved session has expired")]
    SessionExpired,
    #[error("{0} token not found on the page")]
    TokenMissing(&'static str),
    #[error("no student profile found in response")]
    ProfileMissing,
    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid portal URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
