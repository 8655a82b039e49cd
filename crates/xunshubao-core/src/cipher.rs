use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, Key, KeyInit};
use sm4::Sm4;
use thiserror::Error;

use crate::credentials::SYMMETRIC_KEY_LEN;

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;
type Sm4EcbEnc = ecb::Encryptor<Sm4>;
type Sm4EcbDec = ecb::Decryptor<Sm4>;

/// Errors returned when a response body cannot be turned back into plaintext.
///
/// Each variant is a local codec fault: the envelope was corrupted in
/// transit, or the configured key or algorithm pairing does not match what
/// the remote side used. None of them mean "no records found": remote
/// business rejections are reported through the response status code, never
/// through this type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The encrypted data field was not valid standard base64.
    #[error("encrypted data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The ciphertext was not block aligned or its PKCS#7 padding did not
    /// verify after decryption, which usually indicates a key mismatch.
    #[error("ciphertext is misaligned or its padding is invalid")]
    InvalidPadding,
    /// The decrypted bytes were not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// The response reported success but carried no encrypted data field.
    #[error("success response did not carry an encrypted data field")]
    MissingData,
}

/// Encrypts `plaintext` with AES-128-ECB and PKCS#7 padding, returning the
/// base64 ciphertext carried in `requestBody`.
///
/// ECB encrypts each block independently: identical plaintext blocks yield
/// identical ciphertext blocks, and the mode itself provides no integrity.
/// The signature token in the request header is the only tamper check.
pub(crate) fn aes_encrypt(key: &[u8; SYMMETRIC_KEY_LEN], plaintext: &str) -> String {
    let key = Key::<Aes128>::from(*key);
    let ciphertext = Aes128EcbEnc::new(&key).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    BASE64_STANDARD.encode(ciphertext)
}

/// Reverses [`aes_encrypt`]: base64-decode, ECB-decrypt, strip padding,
/// decode as UTF-8.
pub(crate) fn aes_decrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    data: &str,
) -> Result<String, DecodeError> {
    let ciphertext = BASE64_STANDARD.decode(data)?;
    let key = Key::<Aes128>::from(*key);
    let plaintext = Aes128EcbDec::new(&key)
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DecodeError::InvalidPadding)?;
    Ok(String::from_utf8(plaintext)?)
}

/// Encrypts `plaintext` with SM4-ECB and PKCS#7 padding, returning base64.
pub(crate) fn sm4_encrypt(key: &[u8; SYMMETRIC_KEY_LEN], plaintext: &str) -> String {
    let key = Key::<Sm4>::from(*key);
    let ciphertext = Sm4EcbEnc::new(&key).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    BASE64_STANDARD.encode(ciphertext)
}

/// Reverses [`sm4_encrypt`].
pub(crate) fn sm4_decrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    data: &str,
) -> Result<String, DecodeError> {
    let ciphertext = BASE64_STANDARD.decode(data)?;
    let key = Key::<Sm4>::from(*key);
    let plaintext = Sm4EcbDec::new(&key)
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DecodeError::InvalidPadding)?;
    Ok(String::from_utf8(plaintext)?)
}
