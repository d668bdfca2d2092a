mod csrf;

pub use csrf::CsrfSession;
