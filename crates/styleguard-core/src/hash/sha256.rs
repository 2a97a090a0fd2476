use sha2::{Digest, Sha256};

pub fn sha256_hash_string(s: &str) -> String {
    sha256_hash_bytes(s.as_bytes())
}

pub fn sha256_hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
