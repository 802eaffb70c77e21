use serde::{Deserialize, Serialize};
use thiserror::Error;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

/// Error raised while assembling the agent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Configuration for the local file inbox.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Directory where peers drop files and where lifecycle markers live.
    pub dir: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            dir: String::from(".data/inbox"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Configuration {
    /// File inbox configuration
    pub files: FilesConfig,
}

impl Configuration {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Toml::file("peerdrop.toml"))
            .merge(Env::prefixed("PEERDROP__").split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_points_at_local_inbox() {
        let config = Configuration::default();

        assert_eq!(config.files.dir, ".data/inbox");
    }

    #[test]
    fn test_configless_operation() {
        // Loading defaults without any config file must work
        let config = Figment::from(Serialized::defaults(Configuration::default()))
            .extract::<Configuration>()
            .unwrap();

        assert_eq!(config.files.dir, ".data/inbox");
    }

    #[test]
    fn test_toml_file_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "peerdrop.toml",
                r#"
                [files]
                dir = "/var/lib/peerdrop/inbox"
                "#,
            )?;

            let config = Configuration::load().unwrap();
            assert_eq!(config.files.dir, "/var/lib/peerdrop/inbox");

            Ok(())
        });
    }

    #[test]
    fn test_env_var_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PEERDROP__FILES__DIR", "/tmp/drop-inbox");

            let config = Configuration::load().unwrap();
            assert_eq!(config.files.dir, "/tmp/drop-inbox");

            Ok(())
        });
    }

    #[test]
    fn test_env_var_wins_over_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "peerdrop.toml",
                r#"
                [files]
                dir = "/var/lib/peerdrop/inbox"
                "#,
            )?;
            jail.set_env("PEERDROP__FILES__DIR", "/tmp/drop-inbox");

            let config = Configuration::load().unwrap();
            assert_eq!(config.files.dir, "/tmp/drop-inbox");

            Ok(())
        });
    }
}
