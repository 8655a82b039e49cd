use md5::{Digest as _, Md5};
use sm3::Sm3;

use crate::envelope::AlgorithmSuite;

/// Computes the lowercase hex MD5 digest of `data`.
#[must_use]
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Computes the lowercase hex SM3 digest of `data`.
///
/// Besides request signing, the service accepts SM3-hashed identity document
/// numbers in query payloads (`hashParam = "cardNum"`, `hashType = "SM3"`),
/// which callers produce with this helper.
#[must_use]
pub fn sm3_hex(data: &[u8]) -> String {
    hex::encode(Sm3::digest(data))
}

/// Computes the request signature token for a serialized payload.
///
/// The token is the suite's hash over the exact byte sequence
/// `appKey || timestamp || signSecret || payload` with no separators, encoded
/// as lowercase hex. The server recomputes the identical concatenation over
/// the decrypted body, so the payload string must be the same canonical form
/// that gets encrypted.
#[must_use]
pub fn request_token(
    suite: AlgorithmSuite,
    app_key: &str,
    timestamp_ms: u64,
    sign_secret: &str,
    payload: &str,
) -> String {
    let mut source = String::with_capacity(
        app_key.len() + 13 + sign_secret.len() + payload.len(),
    );
    source.push_str(app_key);
    source.push_str(&timestamp_ms.to_string());
    source.push_str(sign_secret);
    source.push_str(payload);

    match suite {
        AlgorithmSuite::Md5Aes => md5_hex(source.as_bytes()),
        AlgorithmSuite::Sm3Sm4 => sm3_hex(source.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_known_vector() {
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn sm3_matches_known_vector() {
        // GB/T 32905-2016 appendix A test vector.
        assert_eq!(
            sm3_hex(b"abc"),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
    }

    #[test]
    fn token_matches_manual_concatenation() {
        let token = request_token(AlgorithmSuite::Md5Aes, "app", 1700000000000, "secret", "{}");
        assert_eq!(token, md5_hex(b"app1700000000000secret{}"));

        let token = request_token(AlgorithmSuite::Sm3Sm4, "app", 1700000000000, "secret", "{}");
        assert_eq!(token, sm3_hex(b"app1700000000000secret{}"));
    }

    #[test]
    fn token_is_sensitive_to_single_byte_payload_change() {
        let base = request_token(AlgorithmSuite::Md5Aes, "app", 1, "secret", r#"{"name":"a"}"#);
        let changed = request_token(AlgorithmSuite::Md5Aes, "app", 1, "secret", r#"{"name":"b"}"#);
        assert_ne!(base, changed);

        let base = request_token(AlgorithmSuite::Sm3Sm4, "app", 1, "secret", r#"{"name":"a"}"#);
        let changed = request_token(AlgorithmSuite::Sm3Sm4, "app", 1, "secret", r#"{"name":"b"}"#);
        assert_ne!(base, changed);
    }

    #[test]
    fn token_is_sensitive_to_timestamp() {
        let first = request_token(AlgorithmSuite::Md5Aes, "app", 1, "secret", "{}");
        let second = request_token(AlgorithmSuite::Md5Aes, "app", 2, "secret", "{}");
        assert_ne!(first, second);
    }
}
