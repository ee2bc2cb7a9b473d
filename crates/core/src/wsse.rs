//! WSSE UsernameToken credentials
//!
//! Hatena authenticates AtomPub requests with an `X-WSSE` header:
//!
//! ```text
//! UsernameToken Username="id", PasswordDigest="...", Nonce="...", Created="..."
//! ```
//!
//! `Nonce` is base64 text and `PasswordDigest` is
//! `base64(sha1(Nonce + Created + api_key))`, hashing the nonce exactly as it
//! appears in the header. A credential must be built fresh for every request.

use base64::Engine;
use sha1::{Digest, Sha1};

/// Header carrying the credential.
pub const WSSE_HEADER: &str = "X-WSSE";

/// One-shot credential for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsseCredential {
    pub username: String,
    pub password_digest: String,
    pub nonce: String,
    pub created: String,
}

/// Text fed into the nonce: the nanosecond timestamp in decimal followed by
/// zero-padded random digits.
pub fn nonce_source(unix_nanos: i64, random: u64) -> String {
    format!("{unix_nanos}{random:020}")
}

/// `base64(sha1(nonce + created + api_key))`.
pub fn password_digest(nonce: &str, created: &str, api_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce.as_bytes());
    hasher.update(created.as_bytes());
    hasher.update(api_key.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

impl WsseCredential {
    /// Build a credential from the raw nonce text and an RFC3339 timestamp.
    pub fn new(username: &str, api_key: &str, raw_nonce: &str, created: &str) -> Self {
        let nonce = base64::engine::general_purpose::STANDARD.encode(raw_nonce);
        let password_digest = password_digest(&nonce, created, api_key);

        Self {
            username: username.to_string(),
            password_digest,
            nonce,
            created: created.to_string(),
        }
    }

    /// Value for the `X-WSSE` header.
    pub fn header_value(&self) -> String {
        format!(
            r#"UsernameToken Username="{}", PasswordDigest="{}", Nonce="{}", Created="{}""#,
            self.username, self.password_digest, self.nonce, self.created
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_source_is_decimal() {
        let source = nonce_source(1_714_566_600_123_456_789, 42);
        assert_eq!(source, "171456660012345678900000000000000000042");
        assert!(source.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_password_digest_known_value() {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        assert_eq!(password_digest("a", "b", "c"), "qZk+NkcGgWq6PiVxeFDCbJzQ2J0=");
    }

    #[test]
    fn test_credential_encodes_nonce_and_digest() {
        let credential =
            WsseCredential::new("alice", "secret", "1234567890", "2024-05-01T12:30:00Z");
        assert_eq!(credential.nonce, "MTIzNDU2Nzg5MA==");
        assert_eq!(
            credential.password_digest,
            password_digest("MTIzNDU2Nzg5MA==", "2024-05-01T12:30:00Z", "secret")
        );
        assert_eq!(credential.password_digest.len(), 28);
    }

    #[test]
    fn test_credential_depends_on_api_key() {
        let a = WsseCredential::new("alice", "key-a", "1", "2024-05-01T12:30:00Z");
        let b = WsseCredential::new("alice", "key-b", "1", "2024-05-01T12:30:00Z");
        assert_ne!(a.password_digest, b.password_digest);
    }

    #[test]
    fn test_header_value_format() {
        let credential = WsseCredential {
            username: "alice".to_string(),
            password_digest: "DIGEST".to_string(),
            nonce: "NONCE".to_string(),
            created: "2024-05-01T12:30:00Z".to_string(),
        };
        assert_eq!(
            credential.header_value(),
            r#"UsernameToken Username="alice", PasswordDigest="DIGEST", Nonce="NONCE", Created="2024-05-01T12:30:00Z""#
        );
    }
}
