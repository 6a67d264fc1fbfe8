//! The server connection record carried inside a token.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Connection parameters for a custom server deployment.
///
/// `host` and `key` are required and non-empty. `api` and `relay` are
/// optional; an unset field is omitted from the serialized form entirely.
/// Field order is part of the wire contract: signatures are computed over the
/// serialized bytes, so reordering would break verification against
/// independently-produced tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    host: String,
    key: String,
    #[serde(default, skip_serializing_if = "is_unset")]
    api: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    relay: Option<String>,
}

/// Empty-but-present and absent are the same thing on the wire.
fn is_unset(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

impl ServerRecord {
    /// Create a record with the two required fields.
    pub fn new(host: impl Into<String>, key: impl Into<String>) -> Result<Self, Error> {
        let host = host.into();
        let key = key.into();
        if host.is_empty() {
            return Err(Error::MalformedRecord("host must be non-empty".into()));
        }
        if key.is_empty() {
            return Err(Error::MalformedRecord("key must be non-empty".into()));
        }
        Ok(Self {
            host,
            key,
            api: None,
            relay: None,
        })
    }

    /// Set the api server address. An empty value leaves the field unset.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        let api = api.into();
        self.api = (!api.is_empty()).then_some(api);
        self
    }

    /// Set the relay server address. An empty value leaves the field unset.
    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        let relay = relay.into();
        self.relay = (!relay.is_empty()).then_some(relay);
        self
    }

    /// The host address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The license key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The api server address, or the empty string when unset.
    ///
    /// Decoding cannot distinguish "absent" from "empty"; both read back as
    /// the empty string here. This collapse is intentional.
    pub fn api(&self) -> &str {
        self.api.as_deref().unwrap_or("")
    }

    /// The relay server address, or the empty string when unset.
    pub fn relay(&self) -> &str {
        self.relay.as_deref().unwrap_or("")
    }

    /// Check required fields and collapse empty optionals to unset.
    ///
    /// Used after deserialization, where serde may have produced
    /// empty-but-present optional fields.
    pub(crate) fn normalized(mut self) -> Result<Self, Error> {
        if self.host.is_empty() {
            return Err(Error::MalformedRecord("missing required field: host".into()));
        }
        if self.key.is_empty() {
            return Err(Error::MalformedRecord("missing required field: key".into()));
        }
        if is_unset(&self.api) {
            self.api = None;
        }
        if is_unset(&self.relay) {
            self.relay = None;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_validated() {
        assert!(ServerRecord::new("example.com", "abc123").is_ok());
        assert!(matches!(
            ServerRecord::new("", "abc123"),
            Err(Error::MalformedRecord(_))
        ));
        assert!(matches!(
            ServerRecord::new("example.com", ""),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn empty_optionals_stay_unset() {
        let record = ServerRecord::new("example.com", "abc123")
            .unwrap()
            .with_api("")
            .with_relay("");
        let plain = ServerRecord::new("example.com", "abc123").unwrap();
        assert_eq!(record, plain);
        assert_eq!(record.api(), "");
        assert_eq!(record.relay(), "");
    }

    #[test]
    fn set_optionals_read_back() {
        let record = ServerRecord::new("example.com", "abc123")
            .unwrap()
            .with_api("https://api.example.com")
            .with_relay("relay.example.com");
        assert_eq!(record.api(), "https://api.example.com");
        assert_eq!(record.relay(), "relay.example.com");
    }
}
