//! Scheduler configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

/// Delay between a file being marked for deletion and the scheduler
/// attempting to remove it.
///
/// A shorter value cleans up tombstoned and partial files sooner; a longer
/// value leaves more room for an interrupted transfer to resume. This is a
/// fixed property of the lifecycle protocol, not a user-facing tunable.
pub const GRACE_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Configuration for a [`FileReaper`](crate::FileReaper) instance.
#[derive(Clone, Debug)]
pub struct ReaperConfig {
    /// Inbox directory the scheduler owns markers in.
    pub dir: PathBuf,
}

impl ReaperConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Validate the scheduler configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            anyhow::bail!("inbox dir must not be empty");
        }

        Ok(())
    }
}

impl From<&common::config::FilesConfig> for ReaperConfig {
    fn from(config: &common::config::FilesConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_files_config() {
        let files = common::config::FilesConfig::default();
        let config = ReaperConfig::from(&files);

        assert_eq!(config.dir, PathBuf::from(".data/inbox"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_dir_is_invalid() {
        let config = ReaperConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grace_period_is_one_hour() {
        assert_eq!(GRACE_PERIOD, Duration::from_secs(3600));
    }
}
