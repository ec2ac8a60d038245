//! Serde helper that carries raw bytes as a base64 string in JSON.

use bytes::Bytes;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serializer;

/// Use with `#[serde(with = "crate::message::encoder::base64_bytes")]`.
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&base64::encode(data))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where D: Deserializer<'de> {
        let encoded = String::deserialize(deserializer)?;
        base64::decode(encoded)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
