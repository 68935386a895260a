use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes the raw object carried by an admission request into a typed
/// resource.
pub trait Decode: Send + Sync + 'static {
    fn decode<K: DeserializeOwned>(&self, raw: &Value) -> serde_json::Result<K>;
}

/// Decodes raw objects with their `serde` implementations.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder(());

// === impl JsonDecoder ===

impl Decode for JsonDecoder {
    fn decode<K: DeserializeOwned>(&self, raw: &Value) -> serde_json::Result<K> {
        K::deserialize(raw)
    }
}
