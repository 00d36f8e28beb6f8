//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments have the highest priority, then `BASKET_*` environment
//! variables, then configuration files.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the CLI asks for it.
    ///
    /// Validation is deferred to [`merge_cli_args`](Self::merge_cli_args) so
    /// that an override such as `--storage memory` can make an otherwise
    /// incomplete file valid.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(ref path) = cli.config {
            loader = loader.with_config_file(path.clone());
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Applies CLI overrides to the base configuration and validates the
    /// result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                storage,
                dry_run: _,
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                // Command-level log level wins over --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
                if let Some(storage) = storage {
                    config.storage.backend = (*storage).into();
                }
            }
            // Migrations always target the configured database
            Commands::Migrate { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use clap::Parser;

    fn base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/basket".to_string();
        config.jwt.secret = "a-test-secret-that-is-long-enough-123".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let merger = ConfigurationMerger::new(base_config());
        let cli = Cli::try_parse_from(["basket-rs"]).unwrap();
        assert_eq!(&merger.merge_cli_args(&cli).unwrap(), merger.config());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["basket-rs", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["basket-rs", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let config = merge(&[
            "basket-rs", "serve", "--host", "0.0.0.0", "--port", "9000", "--storage", "memory",
        ])
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let config = merge(&["basket-rs", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_memory_storage_rescues_missing_database_url() {
        let mut base = base_config();
        base.database.url = String::new();
        let merger = ConfigurationMerger::new(base);

        let postgres = Cli::try_parse_from(["basket-rs", "serve"]).unwrap();
        assert!(merger.merge_cli_args(&postgres).is_err());

        let memory = Cli::try_parse_from(["basket-rs", "serve", "--storage", "memory"]).unwrap();
        assert!(merger.merge_cli_args(&memory).is_ok());
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut base = base_config();
        base.jwt.secret = "short".to_string();
        let cli = Cli::try_parse_from(["basket-rs", "serve"]).unwrap();

        let err = ConfigurationMerger::new(base).merge_cli_args(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
