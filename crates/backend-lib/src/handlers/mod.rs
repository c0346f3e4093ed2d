//! HTTP handlers.

pub mod login;

pub use login::{external_login, get_oauth2_clients, login};
