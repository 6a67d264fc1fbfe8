//! The token transform: reversible, optionally-signed, filename-safe.
//!
//! Forward direction: canonical record bytes, optionally prefixed by a
//! 64-byte Ed25519 signature over those bytes, encoded with URL-safe
//! unpadded base64, then character-reversed. The reversal is an obfuscation
//! layer only, not a security control.
//!
//! Reverse direction: undo the reversal and the base64, then try the
//! unsigned interpretation first. Only when the bytes do not parse as a
//! record directly is the signed framing attempted. There is no format tag
//! distinguishing the two payload kinds; trial order is the contract.

use base64::prelude::*;

use crate::canonical::{canonical_bytes, record_from_bytes};
use crate::crypto::{PublicKey, Signature, SigningKey, SIGNATURE_LEN};
use crate::error::Error;
use crate::record::ServerRecord;

/// The outcome of decoding a token: which interpretation produced the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedToken {
    /// The decoded bytes parsed directly as a record; no signature present.
    Unsigned(ServerRecord),
    /// The record was recovered from signed framing and the signature
    /// verified.
    Signed(ServerRecord),
}

impl DecodedToken {
    /// The decoded record.
    pub fn record(&self) -> &ServerRecord {
        match self {
            Self::Unsigned(record) | Self::Signed(record) => record,
        }
    }

    /// Consume the outcome, yielding the record.
    pub fn into_record(self) -> ServerRecord {
        match self {
            Self::Unsigned(record) | Self::Signed(record) => record,
        }
    }

    /// Whether the record came from the signed path.
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }
}

/// Encode a record into a token, signing it when a key is supplied.
///
/// Unsigned tokens carry the canonical record bytes with no framing at all,
/// not even an empty-signature placeholder.
pub fn encode(record: &ServerRecord, signing_key: Option<&SigningKey>) -> Result<String, Error> {
    let payload = canonical_bytes(record)?;

    let framed = match signing_key {
        Some(key) => {
            let signature = key.sign(&payload);
            // signature || payload, no delimiter; the fixed signature size
            // makes the boundary recoverable
            let mut buf = Vec::with_capacity(SIGNATURE_LEN + payload.len());
            buf.extend_from_slice(signature.as_bytes());
            buf.extend_from_slice(&payload);
            buf
        }
        None => payload,
    };

    let encoded = BASE64_URL_SAFE_NO_PAD.encode(framed);
    Ok(encoded.chars().rev().collect())
}

/// Decode a token back into a record, verifying the signature when the
/// signed interpretation applies.
///
/// The unsigned interpretation is tried first and wins even if a
/// signature-shaped prefix happens to be present. Without a verification key
/// only unsigned tokens can be decoded; anything else fails with
/// [`Error::NoVerificationPossible`].
pub fn decode(token: &str, verify_key: Option<&PublicKey>) -> Result<DecodedToken, Error> {
    let encoded: String = token.chars().rev().collect();
    let decoded = BASE64_URL_SAFE_NO_PAD
        .decode(encoded.as_bytes())
        .map_err(|e| Error::InvalidEncoding(e.to_string()))?;

    if let Ok(record) = record_from_bytes(&decoded) {
        return Ok(DecodedToken::Unsigned(record));
    }

    let Some(key) = verify_key else {
        return Err(Error::NoVerificationPossible);
    };

    if decoded.len() < SIGNATURE_LEN {
        return Err(Error::TruncatedSignedToken { len: decoded.len() });
    }
    let (sig_bytes, message) = decoded.split_at(SIGNATURE_LEN);
    let signature = Signature::from_slice(sig_bytes)?;
    key.verify(message, &signature)?;

    let record = record_from_bytes(message)?;
    Ok(DecodedToken::Signed(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ServerRecord {
        ServerRecord::new("example.com", "abc123").unwrap()
    }

    fn keypair() -> (SigningKey, PublicKey) {
        let key = SigningKey::from_seed(&[0x42; 32]);
        let public = key.public_key();
        (key, public)
    }

    #[test]
    fn unsigned_roundtrip_takes_unsigned_path() {
        let token = encode(&record(), None).unwrap();
        // No verification key needed for the unsigned path
        let decoded = decode(&token, None).unwrap();
        assert!(!decoded.is_signed());
        assert_eq!(decoded.into_record(), record());
    }

    #[test]
    fn signed_roundtrip_takes_signed_path() {
        let (signing, public) = keypair();
        let token = encode(&record(), Some(&signing)).unwrap();
        let decoded = decode(&token, Some(&public)).unwrap();
        assert!(decoded.is_signed());
        assert_eq!(decoded.into_record(), record());
    }

    #[test]
    fn signed_and_unsigned_tokens_differ() {
        let (signing, _) = keypair();
        let unsigned = encode(&record(), None).unwrap();
        let signed = encode(&record(), Some(&signing)).unwrap();
        assert_ne!(unsigned, signed);
    }

    #[test]
    fn wrong_key_rejected() {
        let (signing, _) = keypair();
        let other = SigningKey::from_seed(&[0x43; 32]).public_key();
        let token = encode(&record(), Some(&signing)).unwrap();
        assert!(matches!(
            decode(&token, Some(&other)),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn tampered_payload_rejected() {
        let (signing, public) = keypair();
        let token = encode(&record(), Some(&signing)).unwrap();

        // Flip one bit in the message portion of the decoded bytes and
        // re-apply the transform
        let encoded: String = token.chars().rev().collect();
        let mut decoded = BASE64_URL_SAFE_NO_PAD.decode(encoded.as_bytes()).unwrap();
        let last = decoded.len() - 1;
        decoded[last] ^= 0x01;
        let tampered: String = BASE64_URL_SAFE_NO_PAD
            .encode(&decoded)
            .chars()
            .rev()
            .collect();

        assert!(matches!(
            decode(&tampered, Some(&public)),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn tampered_signature_rejected() {
        let (signing, public) = keypair();
        let token = encode(&record(), Some(&signing)).unwrap();

        let encoded: String = token.chars().rev().collect();
        let mut decoded = BASE64_URL_SAFE_NO_PAD.decode(encoded.as_bytes()).unwrap();
        decoded[0] ^= 0x01;
        let tampered: String = BASE64_URL_SAFE_NO_PAD
            .encode(&decoded)
            .chars()
            .rev()
            .collect();

        assert!(matches!(
            decode(&tampered, Some(&public)),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn invalid_base64_rejected() {
        assert!(matches!(
            decode("not!valid*base64", Some(&keypair().1)),
            Err(Error::InvalidEncoding(_))
        ));
        // Length 1 mod 4 is never valid unpadded base64
        assert!(matches!(
            decode("AAAAA", Some(&keypair().1)),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn short_garbage_with_key_is_truncated() {
        // Valid base64, decodes to fewer than 64 bytes, not a record
        let token: String = BASE64_URL_SAFE_NO_PAD
            .encode(b"garbage")
            .chars()
            .rev()
            .collect();
        assert!(matches!(
            decode(&token, Some(&keypair().1)),
            Err(Error::TruncatedSignedToken { len: 7 })
        ));
    }

    #[test]
    fn garbage_without_key_is_unverifiable() {
        let token: String = BASE64_URL_SAFE_NO_PAD
            .encode(b"garbage")
            .chars()
            .rev()
            .collect();
        assert!(matches!(
            decode(&token, None),
            Err(Error::NoVerificationPossible)
        ));
    }

    #[test]
    fn sixty_four_bytes_of_garbage_fails_verification() {
        // Long enough for the signed interpretation, but nothing verifies
        let token: String = BASE64_URL_SAFE_NO_PAD
            .encode([0u8; 80])
            .chars()
            .rev()
            .collect();
        assert!(matches!(
            decode(&token, Some(&keypair().1)),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn empty_api_and_absent_api_encode_identically() {
        let explicit = ServerRecord::new("example.com", "abc123")
            .unwrap()
            .with_api("")
            .with_relay("");
        let absent = ServerRecord::new("example.com", "abc123").unwrap();
        assert_eq!(encode(&explicit, None).unwrap(), encode(&absent, None).unwrap());
    }

    #[test]
    fn token_alphabet_is_filename_safe() {
        let (signing, _) = keypair();
        let rec = ServerRecord::new("example.com", "abc123")
            .unwrap()
            .with_api("https://api.example.com:21114")
            .with_relay("relay.example.com");
        for token in [
            encode(&rec, None).unwrap(),
            encode(&rec, Some(&signing)).unwrap(),
        ] {
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn unicode_fields_roundtrip() {
        let rec = ServerRecord::new("例え.example", "ключ-123").unwrap();
        let token = encode(&rec, None).unwrap();
        assert_eq!(decode(&token, None).unwrap().into_record(), rec);
    }
}
