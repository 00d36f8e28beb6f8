//! Serve command handler

use crate::config::StorageBackend;
use crate::config::settings::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Starts the server, or with `dry_run` validates the configuration and
    /// prints what would be started.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await
    }

    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.storage.backend {
            StorageBackend::Postgres => println!("✓ Storage: postgres"),
            StorageBackend::Memory => {
                println!("✓ Storage: memory (favorites and carts are lost on restart)")
            }
        }
        println!("✓ Catalog: {}", self.config.catalog.base_url);
        if self.config.cache.enabled {
            println!(
                "✓ Query cache: {} entries, {}s TTL",
                self.config.cache.memory.max_size, self.config.cache.memory.ttl_seconds
            );
        } else {
            println!("✓ Query cache: disabled");
        }

        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
