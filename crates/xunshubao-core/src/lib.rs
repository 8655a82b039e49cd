//! Envelope codec for the Xunshubao V3 judicial-data verification API.
//!
//! Every call to the remote service exchanges the same envelope shape: a
//! plaintext header carrying the caller identity, a millisecond timestamp and
//! a keyed signature token, plus a body that is the canonically serialized
//! business payload encrypted under a symmetric ECB cipher. Two fixed
//! algorithm pairings exist, MD5 signing with AES-128 and the SM3/SM4
//! national-standard pairing, and a request must never mix them.
//!
//! This crate performs no I/O. [`build_envelope`] turns credentials and a
//! payload into a ready-to-post [`RequestEnvelope`]; [`parse_response`] turns
//! a decoded [`ResponseEnvelope`] back into plaintext or a typed failure.

mod cipher;
mod credentials;
mod envelope;
mod payload;
mod sign;

pub use crate::cipher::DecodeError;
pub use crate::credentials::{Credentials, CredentialsError, SYMMETRIC_KEY_LEN};
pub use crate::envelope::{
    build_envelope, build_envelope_with_timestamp, parse_response, AlgorithmSuite, BuildError,
    Encryption, QueryOutcome, RequestEnvelope, RequestHeader, ResponseEnvelope, SignType,
    CODE_LOCAL_FAILURE, CODE_SUCCESS,
};
pub use crate::payload::canonical_json;
pub use crate::sign::{md5_hex, request_token, sm3_hex};
