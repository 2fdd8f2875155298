pub mod session;

pub use session::{ReportSession, cookie_key, remember_report};
