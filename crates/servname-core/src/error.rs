//! Error types for servname core operations.

use thiserror::Error;

/// Errors that can occur while building keys, encoding records, or decoding
/// tokens.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid token encoding: {0}")]
    InvalidEncoding(String),

    #[error("decoded token too short for a signature: {len} bytes")]
    TruncatedSignedToken { len: usize },

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("token did not parse as an unsigned record and no verification key was supplied")]
    NoVerificationPossible,
}
