//! # servname core
//!
//! Packs server connection parameters into opaque, reversible,
//! filename-safe tokens, optionally signed with Ed25519, and recovers them.
//!
//! This crate contains no I/O and no key management. It is pure computation:
//! callers supply a record and key material, and get back a string or a
//! record.
//!
//! ## Key Types
//!
//! - [`ServerRecord`] - The connection parameters payload
//! - [`DecodedToken`] - Tagged decode outcome (unsigned vs. signed path)
//! - [`PublicKey`] / [`SigningKey`] - Ed25519 key material wrappers
//!
//! ## The transform
//!
//! Canonical JSON, optional `signature || payload` framing, URL-safe
//! unpadded base64, character reversal. See [`token`] for the decode trial
//! order.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod record;
pub mod token;

pub use canonical::{canonical_bytes, record_from_bytes};
pub use crypto::{PublicKey, Signature, SigningKey, KEYPAIR_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};
pub use error::Error;
pub use record::ServerRecord;
pub use token::{decode, encode, DecodedToken};
