// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `Vizboard` login server.

pub mod classifier;

pub use classifier::refresh_token_on_failure;

#[cfg(test)]
mod tests;
