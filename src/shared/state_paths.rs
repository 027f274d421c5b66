use std::path::PathBuf;

pub const CONFIGURATIONS_DIR: &str = "configurations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn configurations_dir(&self) -> PathBuf {
        self.root.join(CONFIGURATIONS_DIR)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("logs/kubeapply.log")
    }
}
