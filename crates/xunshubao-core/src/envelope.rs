use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cipher::{aes_decrypt, aes_encrypt, sm4_decrypt, sm4_encrypt, DecodeError};
use crate::credentials::Credentials;
use crate::payload::canonical_json;
use crate::sign::request_token;

/// Status code reported by the service when a query succeeded and the
/// response carries an encrypted data payload.
pub const CODE_SUCCESS: &str = "0000";

/// Status code reserved for failures that happened on the client side
/// (transport faults, unreadable responses) rather than at the service.
pub const CODE_LOCAL_FAILURE: &str = "9999";

/// Signature hash algorithm tag carried in the request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignType {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SM3")]
    Sm3,
}

/// Body cipher algorithm tag carried in the request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encryption {
    #[serde(rename = "AES")]
    Aes,
    #[serde(rename = "SM4")]
    Sm4,
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Md5 => "MD5",
            Self::Sm3 => "SM3",
        })
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aes => "AES",
            Self::Sm4 => "SM4",
        })
    }
}

/// Fixed pairing of signature hash and body cipher.
///
/// The service defines exactly two pairings; a signature algorithm from one
/// is never combined with the cipher of the other, and representing the pair
/// as a single selector makes such a mix unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmSuite {
    /// MD5 request signing with AES-128-ECB body encryption.
    Md5Aes,
    /// SM3 request signing with SM4-ECB body encryption (GB/T national
    /// standard pairing).
    Sm3Sm4,
}

impl AlgorithmSuite {
    /// Returns the `signType` header tag for this pairing.
    #[must_use]
    pub fn sign_type(self) -> SignType {
        match self {
            Self::Md5Aes => SignType::Md5,
            Self::Sm3Sm4 => SignType::Sm3,
        }
    }

    /// Returns the `encryption` header tag for this pairing.
    #[must_use]
    pub fn encryption(self) -> Encryption {
        match self {
            Self::Md5Aes => Encryption::Aes,
            Self::Sm3Sm4 => Encryption::Sm4,
        }
    }

    fn encrypt(self, credentials: &Credentials, plaintext: &str) -> String {
        match self {
            Self::Md5Aes => aes_encrypt(credentials.aes_key(), plaintext),
            Self::Sm3Sm4 => sm4_encrypt(credentials.sm4_key(), plaintext),
        }
    }

    fn decrypt(self, credentials: &Credentials, data: &str) -> Result<String, DecodeError> {
        match self {
            Self::Md5Aes => aes_decrypt(credentials.aes_key(), data),
            Self::Sm3Sm4 => sm4_decrypt(credentials.sm4_key(), data),
        }
    }
}

/// Plaintext request header preceding the encrypted body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeader {
    pub app_key: String,
    /// Milliseconds since the Unix epoch, captured fresh per request.
    pub timestamp: u64,
    /// Lowercase hex signature over `appKey || timestamp || signSecret ||
    /// serialized payload`.
    pub token: String,
    pub sign_type: SignType,
    /// Caller-supplied correlation identifier, opaque to the protocol.
    pub request_id: String,
    pub encryption: Encryption,
}

/// Complete signed and encrypted request, ready to POST as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub request_header: RequestHeader,
    /// Base64 of the ECB-encrypted, PKCS#7-padded canonical payload.
    pub request_body: String,
}

/// Response envelope as decoded from the transport body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub code: String,
    pub msg: String,
    /// Present only on success; base64 of the encrypted result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Decoded result of one query round trip.
///
/// A non-success `code` is a normal business outcome (subject not found,
/// invalid credentials, rate limited) that the caller decides how to handle;
/// it is deliberately not an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub code: String,
    pub msg: String,
    /// Decrypted result payload, present only when `code` is [`CODE_SUCCESS`].
    pub data: Option<String>,
}

impl QueryOutcome {
    /// Returns `true` when the remote service reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

/// Errors produced while assembling a request envelope.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The business payload could not be serialized to JSON.
    #[error("failed to serialize request payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Builds a signed and encrypted envelope for `payload` using the current
/// wall-clock time.
///
/// The timestamp is read fresh on every call; no client-side freshness
/// window is enforced, replay policing is the server's concern.
pub fn build_envelope<T: Serialize>(
    credentials: &Credentials,
    request_id: &str,
    payload: &T,
    suite: AlgorithmSuite,
) -> Result<RequestEnvelope, BuildError> {
    build_envelope_with_timestamp(credentials, request_id, payload, suite, unix_millis())
}

/// Builds an envelope with an explicit timestamp.
///
/// Exists so signature computation can be verified deterministically; real
/// requests should go through [`build_envelope`].
pub fn build_envelope_with_timestamp<T: Serialize>(
    credentials: &Credentials,
    request_id: &str,
    payload: &T,
    suite: AlgorithmSuite,
    timestamp_ms: u64,
) -> Result<RequestEnvelope, BuildError> {
    let serialized = canonical_json(payload)?;
    let token = request_token(
        suite,
        credentials.app_key(),
        timestamp_ms,
        credentials.sign_secret(),
        &serialized,
    );
    let request_body = suite.encrypt(credentials, &serialized);

    Ok(RequestEnvelope {
        request_header: RequestHeader {
            app_key: credentials.app_key().to_string(),
            timestamp: timestamp_ms,
            token,
            sign_type: suite.sign_type(),
            request_id: request_id.to_string(),
            encryption: suite.encryption(),
        },
        request_body,
    })
}

/// Validates a response envelope and decrypts its payload.
///
/// On [`CODE_SUCCESS`] the `data` field is decrypted with the same pairing
/// that built the request. Any other status passes through untouched with an
/// absent payload. Failing to decode what the remote sent is a
/// [`DecodeError`], kept distinct from remote rejection so callers never
/// mistake a key mismatch for "no records found".
pub fn parse_response(
    credentials: &Credentials,
    response: &ResponseEnvelope,
    suite: AlgorithmSuite,
) -> Result<QueryOutcome, DecodeError> {
    if response.code != CODE_SUCCESS {
        return Ok(QueryOutcome {
            code: response.code.clone(),
            msg: response.msg.clone(),
            data: None,
        });
    }

    let encrypted = response.data.as_deref().ok_or(DecodeError::MissingData)?;
    let plaintext = suite.decrypt(credentials, encrypted)?;

    Ok(QueryOutcome {
        code: response.code.clone(),
        msg: response.msg.clone(),
        data: Some(plaintext),
    })
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;
    use serde_json::{json, Value};

    use super::*;
    use crate::sign::request_token;

    fn test_credentials() -> Credentials {
        let sm4 = BASE64_STANDARD.encode([0x42u8; 16]);
        Credentials::new("test-app-key", "test-sign-secret", "0123456789abcdef", &sm4)
            .expect("credentials")
    }

    #[test]
    fn header_tags_follow_the_suite() {
        let creds = test_credentials();
        let payload = json!({"name": "某某公司", "pageNo": 1});

        let md5 = build_envelope_with_timestamp(&creds, "req-1", &payload, AlgorithmSuite::Md5Aes, 1)
            .expect("envelope");
        assert_eq!(md5.request_header.sign_type, SignType::Md5);
        assert_eq!(md5.request_header.encryption, Encryption::Aes);

        let sm3 = build_envelope_with_timestamp(&creds, "req-1", &payload, AlgorithmSuite::Sm3Sm4, 1)
            .expect("envelope");
        assert_eq!(sm3.request_header.sign_type, SignType::Sm3);
        assert_eq!(sm3.request_header.encryption, Encryption::Sm4);
    }

    #[test]
    fn token_covers_the_encrypted_payload_bytes() {
        let creds = test_credentials();
        let payload = json!({"name": "姓名", "cardNum": "110101199001011234"});
        let timestamp = 1_700_000_000_123u64;

        for suite in [AlgorithmSuite::Md5Aes, AlgorithmSuite::Sm3Sm4] {
            let envelope =
                build_envelope_with_timestamp(&creds, "req-7", &payload, suite, timestamp)
                    .expect("envelope");

            // Decrypting the body must give back exactly the string the
            // token was computed over.
            let response = ResponseEnvelope {
                code: CODE_SUCCESS.to_string(),
                msg: "OK".to_string(),
                data: Some(envelope.request_body.clone()),
            };
            let outcome = parse_response(&creds, &response, suite).expect("outcome");
            let serialized = outcome.data.expect("payload");

            let expected = request_token(
                suite,
                creds.app_key(),
                timestamp,
                "test-sign-secret",
                &serialized,
            );
            assert_eq!(envelope.request_header.token, expected);
        }
    }

    #[test]
    fn wire_shape_matches_the_service_contract() {
        let creds = test_credentials();
        let payload = json!({"dataType": "zhixing", "dataId": "7c8f5f4f", "extra": ""});
        let envelope =
            build_envelope_with_timestamp(&creds, "abc123", &payload, AlgorithmSuite::Md5Aes, 42)
                .expect("envelope");

        let value = serde_json::to_value(&envelope).expect("json");
        let header = value
            .get("requestHeader")
            .and_then(Value::as_object)
            .expect("requestHeader object");

        assert_eq!(header.get("appKey"), Some(&json!("test-app-key")));
        assert_eq!(header.get("timestamp"), Some(&json!(42)));
        assert_eq!(header.get("signType"), Some(&json!("MD5")));
        assert_eq!(header.get("requestId"), Some(&json!("abc123")));
        assert_eq!(header.get("encryption"), Some(&json!("AES")));
        assert!(header.get("token").and_then(Value::as_str).is_some());
        assert!(value.get("requestBody").and_then(Value::as_str).is_some());
    }

    #[test]
    fn insertion_order_of_payload_fields_does_not_change_the_token() {
        let creds = test_credentials();
        let first = json!({"name": "a", "pageNo": 1, "pageSize": 10});
        let second = json!({"pageSize": 10, "pageNo": 1, "name": "a"});

        let a = build_envelope_with_timestamp(&creds, "r", &first, AlgorithmSuite::Sm3Sm4, 99)
            .expect("envelope");
        let b = build_envelope_with_timestamp(&creds, "r", &second, AlgorithmSuite::Sm3Sm4, 99)
            .expect("envelope");
        assert_eq!(a.request_header.token, b.request_header.token);
        assert_eq!(a.request_body, b.request_body);
    }

    #[test]
    fn parse_response_round_trips_captured_success() {
        let creds = test_credentials();
        let plaintext = r#"{"items":[],"total":0}"#;
        let response = ResponseEnvelope {
            code: CODE_SUCCESS.to_string(),
            msg: "成功".to_string(),
            data: Some(crate::cipher::sm4_encrypt(creds.sm4_key(), plaintext)),
        };

        let outcome = parse_response(&creds, &response, AlgorithmSuite::Sm3Sm4).expect("outcome");
        assert!(outcome.is_success());
        assert_eq!(outcome.msg, "成功");
        assert_eq!(outcome.data.as_deref(), Some(plaintext));
    }

    #[test]
    fn business_rejection_passes_through_without_error() {
        let creds = test_credentials();
        let response = ResponseEnvelope {
            code: "1001".to_string(),
            msg: "not found".to_string(),
            data: None,
        };

        let outcome = parse_response(&creds, &response, AlgorithmSuite::Md5Aes).expect("outcome");
        assert!(!outcome.is_success());
        assert_eq!(outcome.code, "1001");
        assert_eq!(outcome.msg, "not found");
        assert_eq!(outcome.data, None);
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let creds = test_credentials();
        let response = ResponseEnvelope {
            code: CODE_SUCCESS.to_string(),
            msg: "OK".to_string(),
            data: Some("***".to_string()),
        };

        let err = parse_response(&creds, &response, AlgorithmSuite::Md5Aes).expect_err("err");
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn success_without_data_is_a_decode_error() {
        let creds = test_credentials();
        let response = ResponseEnvelope {
            code: CODE_SUCCESS.to_string(),
            msg: "OK".to_string(),
            data: None,
        };

        let err = parse_response(&creds, &response, AlgorithmSuite::Sm3Sm4).expect_err("err");
        assert!(matches!(err, DecodeError::MissingData));
    }

    #[test]
    fn response_envelope_tolerates_missing_data_field() {
        let decoded: ResponseEnvelope =
            serde_json::from_str(r#"{"code":"1001","msg":"not found"}"#).expect("decode");
        assert_eq!(decoded.data, None);
    }

    #[test]
    fn concurrent_builds_share_credentials_without_interference() {
        let creds = test_credentials();

        std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for i in 0..8u32 {
                let creds = &creds;
                handles.push(scope.spawn(move || {
                    let payload = json!({"name": format!("subject-{i}"), "pageNo": i});
                    let suite = if i % 2 == 0 {
                        AlgorithmSuite::Md5Aes
                    } else {
                        AlgorithmSuite::Sm3Sm4
                    };
                    let envelope = build_envelope(creds, &format!("req-{i}"), &payload, suite)
                        .expect("envelope");

                    let response = ResponseEnvelope {
                        code: CODE_SUCCESS.to_string(),
                        msg: "OK".to_string(),
                        data: Some(envelope.request_body.clone()),
                    };
                    let outcome = parse_response(creds, &response, suite).expect("outcome");
                    (i, envelope, outcome.data.expect("payload"))
                }));
            }

            for handle in handles {
                let (i, envelope, serialized) = handle.join().expect("thread");
                assert_eq!(envelope.request_header.request_id, format!("req-{i}"));
                assert!(serialized.contains(&format!("subject-{i}")));
            }
        });
    }
}
