use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

/// File content from a request body: either a JSON string or a JSON object
/// kept byte-for-byte as it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValue(Vec<u8>);

impl FileValue {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl<'de> Deserialize<'de> for FileValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();
        if text.starts_with('{') {
            return Ok(Self(text.as_bytes().to_vec()));
        }
        if text.starts_with('"') {
            let content: String = serde_json::from_str(text).map_err(D::Error::custom)?;
            return Ok(Self(content.into_bytes()));
        }
        Err(D::Error::custom(format!(
            "invalid file value {text}: expected string or object"
        )))
    }
}
