use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of the AES-128 and SM4 keys used by the envelope ciphers.
pub const SYMMETRIC_KEY_LEN: usize = 16;

/// Caller-held secret bundle issued by the service operator.
///
/// The bundle is immutable for the process lifetime and may be shared across
/// threads; the codec holds no mutable state. Secret material is wiped from
/// memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    app_key: String,
    sign_secret: String,
    aes_key: [u8; SYMMETRIC_KEY_LEN],
    sm4_key: [u8; SYMMETRIC_KEY_LEN],
}

/// Errors returned when constructing [`Credentials`] from configured strings.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The AES key string was not exactly [`SYMMETRIC_KEY_LEN`] bytes.
    #[error("AES key must be {expected} bytes, got {actual}")]
    AesKeyLength { expected: usize, actual: usize },
    /// The SM4 key string was not valid standard base64.
    #[error("SM4 key is not valid base64: {0}")]
    Sm4KeyEncoding(#[from] base64::DecodeError),
    /// The decoded SM4 key was not exactly [`SYMMETRIC_KEY_LEN`] bytes.
    #[error("SM4 key must decode to {expected} bytes, got {actual}")]
    Sm4KeyLength { expected: usize, actual: usize },
}

impl Credentials {
    /// Builds a credential bundle from the strings handed out with an API
    /// subscription.
    ///
    /// The AES key is used byte-for-byte, while the SM4 key is distributed
    /// base64-encoded and decoded here; both must yield a 16-byte key.
    pub fn new(
        app_key: impl Into<String>,
        sign_secret: impl Into<String>,
        aes_key: &str,
        sm4_key_base64: &str,
    ) -> Result<Self, CredentialsError> {
        let aes_bytes = aes_key.as_bytes();
        if aes_bytes.len() != SYMMETRIC_KEY_LEN {
            return Err(CredentialsError::AesKeyLength {
                expected: SYMMETRIC_KEY_LEN,
                actual: aes_bytes.len(),
            });
        }
        let mut aes = [0u8; SYMMETRIC_KEY_LEN];
        aes.copy_from_slice(aes_bytes);

        let sm4_bytes = BASE64_STANDARD.decode(sm4_key_base64)?;
        if sm4_bytes.len() != SYMMETRIC_KEY_LEN {
            return Err(CredentialsError::Sm4KeyLength {
                expected: SYMMETRIC_KEY_LEN,
                actual: sm4_bytes.len(),
            });
        }
        let mut sm4 = [0u8; SYMMETRIC_KEY_LEN];
        sm4.copy_from_slice(&sm4_bytes);

        Ok(Self {
            app_key: app_key.into(),
            sign_secret: sign_secret.into(),
            aes_key: aes,
            sm4_key: sm4,
        })
    }

    /// Returns the application identifier sent in plaintext request headers.
    #[must_use]
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub(crate) fn sign_secret(&self) -> &str {
        &self.sign_secret
    }

    pub(crate) fn aes_key(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.aes_key
    }

    pub(crate) fn sm4_key(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.sm4_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("sign_secret", &"<redacted>")
            .field("aes_key", &"<redacted>")
            .field("sm4_key", &"<redacted>")
            .finish()
    }
}
