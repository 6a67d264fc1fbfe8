//! Canonical JSON encoding for the server record.
//!
//! The canonical form is compact JSON with fields in declaration order
//! (host, key, api, relay) and unset optionals omitted. Signatures are
//! computed over these exact bytes, so the same record must produce
//! byte-identical output everywhere; serde_json's compact struct encoding
//! gives us that (no whitespace, stable field order).

use crate::error::Error;
use crate::record::ServerRecord;

/// Encode a record to its canonical byte form.
pub fn canonical_bytes(record: &ServerRecord) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(record).map_err(|e| Error::MalformedRecord(e.to_string()))
}

/// Decode a record from canonical bytes.
///
/// Unknown fields are ignored. Fails with [`Error::MalformedRecord`] when the
/// bytes are not valid JSON of the expected shape or a required field is
/// missing.
pub fn record_from_bytes(bytes: &[u8]) -> Result<ServerRecord, Error> {
    let record: ServerRecord =
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedRecord(e.to_string()))?;
    record.normalized()
}
