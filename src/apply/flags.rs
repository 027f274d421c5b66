use crate::apply::ApplyError;
use std::collections::BTreeMap;
use std::time::Duration;

pub const TIMEOUT_FLAG: &str = "timeout";
pub const DEFAULT_OUTPUT_ARG: &str = "--output=json";
pub const CONFIGURATION_EXTENSIONS: [&str; 3] = [".json", ".yaml", ".yml"];

/// Flags for the external tool, keyed by name. An empty value marks a
/// boolean flag. Iteration is always in lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(BTreeMap<String, String>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses the `timeout` flag, if any. Command building does not depend
    /// on this succeeding.
    pub fn timeout(&self) -> Result<Option<Duration>, ApplyError> {
        let Some(raw) = self.get(TIMEOUT_FLAG) else {
            return Ok(None);
        };
        humantime::parse_duration(raw)
            .map(Some)
            .map_err(|err| ApplyError::InvalidTimeout {
                value: raw.to_string(),
                reason: err.to_string(),
            })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Flags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub executable: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn cmdline(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_help_flag(&self) -> bool {
        self.args.iter().any(|arg| arg == "-h" || arg == "--help")
    }
}

pub fn normalize_flag(key: &str) -> String {
    if key.starts_with('-') {
        return key.to_string();
    }
    if key.chars().count() == 1 {
        return format!("-{key}");
    }
    format!("--{key}")
}

pub fn build_command_line<'a>(
    executable: &str,
    subcommand: &str,
    flags: &Flags,
    filenames: impl IntoIterator<Item = &'a str>,
) -> CommandLine {
    let mut args = vec![subcommand.to_string()];
    let mut filename_flag = false;
    let mut output_flag = false;

    for (key, value) in flags.iter() {
        let flag = normalize_flag(key);
        match flag.as_str() {
            "-f" | "--filename" => filename_flag = true,
            "-o" | "--output" => output_flag = true,
            _ => {}
        }

        if value.is_empty() {
            args.push(flag);
        } else {
            args.push(format!("{flag}={value}"));
        }
    }

    if !filename_flag && has_configuration_file(filenames) {
        args.push("--filename=./".to_string());
        args.push("--recursive".to_string());
    }

    if !output_flag {
        args.push(DEFAULT_OUTPUT_ARG.to_string());
    }

    CommandLine {
        executable: executable.to_string(),
        args,
    }
}

fn has_configuration_file<'a>(filenames: impl IntoIterator<Item = &'a str>) -> bool {
    filenames.into_iter().any(|name| {
        CONFIGURATION_EXTENSIONS
            .iter()
            .any(|extension| name.ends_with(extension))
    })
}
