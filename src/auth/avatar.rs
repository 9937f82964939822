// Gravatar URL derivation

use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://gravatar.com/avatar";

/// Size 200, rating pg, "mystery man" fallback; keys kept in sorted order
const GRAVATAR_QUERY: &str = "d=mm&r=pg&s=200";

/// Build the Gravatar URL for an email address
///
/// Gravatar keys avatars by the hash of the trimmed, lowercased address.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{}/{:x}?{}", GRAVATAR_BASE, digest, GRAVATAR_QUERY)
}
