//! Ed25519 key and signature types.
//!
//! Wraps ed25519-dalek with strong types sized to the scheme's contracts:
//! 32-byte public keys, 64-byte signatures, 64-byte keypair buffers.

use ed25519_dalek::{Signer, Verifier, VerifyingKey};
use std::fmt;

use crate::error::Error;

/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Length of an Ed25519 keypair buffer (seed followed by public key).
pub const KEYPAIR_LEN: usize = 64;

/// A 32-byte Ed25519 public key used to verify token signatures.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let arr: [u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), Error> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| Error::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| Error::SignatureInvalid)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let arr: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A signing key for producing token signatures.
///
/// Wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create from a 64-byte keypair buffer (seed followed by public key).
    ///
    /// Fails with [`Error::InvalidKeyLength`] for any other length and with
    /// [`Error::InvalidPrivateKey`] when the public half does not match the
    /// seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let arr: [u8; KEYPAIR_LEN] = bytes.try_into().map_err(|_| Error::InvalidKeyLength {
            expected: KEYPAIR_LEN,
            actual: bytes.len(),
        })?;
        let inner = ed25519_dalek::SigningKey::from_keypair_bytes(&arr)
            .map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.inner.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.inner.sign(message).to_bytes())
    }

    /// Get the 64-byte keypair buffer (seed followed by public key).
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LEN] {
        self.inner.to_keypair_bytes()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({:?})", self.public_key())
    }
}
