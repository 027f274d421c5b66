use crate::apply::ApplyError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Names the audit directory reserves for its own records.
pub const RESERVED_AUDIT_FILENAMES: [&str; 3] = ["description", "request", "response"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadValidator {
    reserved: BTreeSet<String>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(&RESERVED_AUDIT_FILENAMES)
    }
}

impl UploadValidator {
    pub fn new(reserved: &[&str]) -> Self {
        Self {
            reserved: reserved.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn validate(&self, files: &BTreeMap<String, Vec<u8>>) -> Result<(), ApplyError> {
        for path in files.keys() {
            self.check_path(path)?;
        }
        Ok(())
    }

    pub fn check_path(&self, path: &str) -> Result<(), ApplyError> {
        let unsafe_path = self.reserved.contains(path)
            || path.contains("..")
            || path.starts_with('/')
            || Path::new(path).is_absolute();
        if unsafe_path {
            return Err(ApplyError::UnsafeUpload {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}
