// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Random secret material.
//! Federated accounts never log in with a password, so they are created with
//! an unguessable one drawn from OS entropy.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use scrypt::password_hash::rand_core::{OsRng, RngCore};

/// Default size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_SECRET_BYTES: usize = 32;

/** Generate a random secret suitable as an unusable account password
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secret() -> String {
    generate_secret_with_size(DEFAULT_SECRET_BYTES)
}

/** Generate a random secret of the given size
# Arguments
* `bytes` - The size of the secret in bytes */
pub fn generate_secret_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
