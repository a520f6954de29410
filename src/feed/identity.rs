//! Feed identity derivation.
//!
//! Two subscriptions share stored items when their URLs collapse to the
//! same key. The key is deliberately loose: every non-alphanumeric
//! character is stripped before hashing, so `https://example.com/feed`
//! and `http://example.com/feed/` are the same feed.

use md5::{Digest, Md5};

/// Derive the shared storage key for a feed URL.
///
/// Strips all non-ASCII-alphanumeric characters, then returns the
/// lowercase hex MD5 of what remains. Scheme, slashes, dots, query
/// separators all disappear, which is what makes near-identical URLs
/// collapse to one feed.
pub fn derive_key(url: &str) -> String {
    let stripped: String = url.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

    let mut hasher = Md5::new();
    hasher.update(stripped.as_bytes());
    format!("{:x}", hasher.finalize())
}
