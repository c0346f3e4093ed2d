// ============================
// crates/backend-lib/src/metrics.rs
// ============================

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_INACTIVE: &str = "login.inactive";
pub const LOGIN_INVALID: &str = "login.invalid";
pub const LOGIN_EXTERNAL: &str = "login.external";
pub const TOKEN_REFRESHED: &str = "token.refreshed";
pub const REQUEST_FAILED: &str = "request.failed";
