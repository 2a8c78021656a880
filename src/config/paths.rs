//! Path resolution for hook configuration and log files.
//!
//! All hook data is stored in `~/.hook/` (or `$HOOK_HOME` when set):
//! - `config.yaml` - Main configuration file
//! - `logs/` - Log output of the interactive timer

use std::path::PathBuf;

use crate::error::HookError;

/// Environment variable that overrides the data root.
pub const HOME_ENV: &str = "HOOK_HOME";

/// Paths to hook configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.hook/`
    pub root: PathBuf,
    /// Config file: `~/.hook/config.yaml`
    pub config_file: PathBuf,
    /// Logs directory: `~/.hook/logs/`
    pub logs: PathBuf,
    /// Log file: `~/.hook/logs/hook.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `$HOOK_HOME`, falling back to the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `$HOOK_HOME` nor `$HOME` is set.
    pub fn new() -> Result<Self, HookError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            if !root.trim().is_empty() {
                return Ok(Self::with_root(PathBuf::from(root)));
            }
        }

        let home = std::env::var("HOME")
            .map_err(|_| HookError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".hook")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        let logs = root.join("logs");
        Self {
            config_file: root.join("config.yaml"),
            log_file: logs.join("hook.log"),
            logs,
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), HookError> {
        for dir in [&self.root, &self.logs] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    HookError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".hook")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-hook");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.logs, root.join("logs"));
        assert_eq!(paths.log_file, root.join("logs").join("hook.log"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
        assert!(paths.logs.exists());
    }
}
