pub mod sha256;

pub use sha256::{sha256_hash_bytes, sha256_hash_string};
