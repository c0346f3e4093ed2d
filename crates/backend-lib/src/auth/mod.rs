// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;
pub mod token_generator;
pub mod user;
mod service;
mod service_impl;

pub use password::{hash_password, hash_password_secure, verify_password, verify_password_blocking};
pub use service::UserService;
pub use service_impl::DefaultUserService;
pub use token::{bearer_token, Claims, TokenEntity, TokenError, TokenUtils};
pub use user::{OAuth2Identity, Principal, User};
