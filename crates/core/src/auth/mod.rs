//! Secret hashing for API keys.
//!
//! NetLedger authenticates callers with a bearer API key rather than a
//! password, but the hashing concern is identical: never store the secret
//! itself, only an Argon2id hash of it plus a short lookup prefix.

mod api_key;
mod password;

pub use api_key::{KEY_PREFIX_LEN, generate_api_key, key_prefix};
pub use password::{PasswordError, hash_password, verify_password};
