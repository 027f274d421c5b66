use crate::apply::ApplyError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::path::PathBuf;

/// Stdout of the external tool: embedded verbatim when it is valid JSON,
/// otherwise carried as a JSON string.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    RawJson(Box<RawValue>),
    Text(String),
}

impl CommandOutput {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match serde_json::from_str::<Box<RawValue>>(&text) {
            // A JSON string literal embeds the same way as its decoded text.
            Ok(raw) if raw.get().starts_with('"') => {
                serde_json::from_str(raw.get()).map_or(Self::Text(text), Self::Text)
            }
            Ok(raw) => Self::RawJson(raw),
            Err(_) => Self::Text(text),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::RawJson(raw) => raw.get(),
            Self::Text(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::RawJson(_))
    }
}

impl Default for CommandOutput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl PartialEq for CommandOutput {
    fn eq(&self, other: &Self) -> bool {
        self.is_json() == other.is_json() && self.as_str() == other.as_str()
    }
}

impl Serialize for CommandOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::RawJson(raw) => raw.serialize(serializer),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for CommandOutput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        if raw.get().starts_with('"') {
            let text: String = serde_json::from_str(raw.get()).map_err(D::Error::custom)?;
            return Ok(Self::Text(text));
        }
        Ok(Self::RawJson(raw))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub cmdline: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default, skip_serializing_if = "CommandOutput::is_empty")]
    pub stdout: CommandOutput,
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Response {
    /// Response for a request that failed before the tool was started.
    pub fn aborted(id: impl Into<String>, error: &ApplyError) -> Self {
        Self {
            id: id.into(),
            stderr: error.to_string(),
            exit_code: -1,
            ..Self::default()
        }
    }

    /// Folds an execution-layer error into stderr. A non-zero exit is
    /// already visible through `exit_code`, so the tool's stderr stays as
    /// written.
    pub fn embed_error(&mut self, error: &ApplyError) {
        if error.is_process_exit() {
            return;
        }
        if self.stderr.is_empty() {
            self.stderr = error.to_string();
        } else {
            self.stderr
                .push_str(&format!("\nkubeapply exec error: {error}"));
        }
    }

    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ApplyError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(ApplyError::EncodeResponse)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_stdout_is_embedded_and_text_is_quoted() {
        let json = CommandOutput::from_text("{\"kind\":\"List\"}\n");
        assert!(json.is_json());
        let text = CommandOutput::from_text("xyz123 --output=json\n");
        assert!(!text.is_json());

        let encoded = serde_json::to_string(&Response {
            stdout: json,
            ..Response::default()
        })
        .expect("encode");
        assert!(encoded.contains("\"stdout\":{\"kind\":\"List\"}"));

        let encoded = serde_json::to_string(&Response {
            stdout: text,
            ..Response::default()
        })
        .expect("encode");
        assert!(encoded.contains("\"stdout\":\"xyz123 --output=json\\n\""));
    }

    #[test]
    fn json_string_stdout_reloads_unchanged() {
        let response = Response {
            stdout: CommandOutput::from_text("\"abc\"\n"),
            ..Response::default()
        };
        assert_eq!(response.stdout, CommandOutput::Text("abc".to_string()));

        let encoded = serde_json::to_string(&response).expect("encode");
        assert!(encoded.contains("\"stdout\":\"abc\""));
        let decoded: Response = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, response);
    }

    #[test]
    fn empty_optional_fields_are_omitted() {
        let encoded = serde_json::to_string(&Response::default()).expect("encode");
        assert!(!encoded.contains("\"id\""));
        assert!(!encoded.contains("\"stdout\""));
        assert!(!encoded.contains("\"dir\""));
        assert!(encoded.contains("\"exit_code\":0"));
    }

    #[test]
    fn embed_error_skips_process_exit() {
        let mut response = Response {
            stderr: "boom\n".to_string(),
            ..Response::default()
        };
        response.embed_error(&ApplyError::ProcessExit { code: 2 });
        assert_eq!(response.stderr, "boom\n");

        response.embed_error(&ApplyError::Canceled);
        assert_eq!(
            response.stderr,
            "boom\n\nkubeapply exec error: process canceled before completion"
        );

        let mut empty = Response::default();
        empty.embed_error(&ApplyError::Canceled);
        assert_eq!(empty.stderr, "process canceled before completion");
    }
}
