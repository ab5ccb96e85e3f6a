//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context as _, Result};
use storefront_cache::{Cache, FallbackBackend, FileBackend};
use storefront_commerce::api::HttpStorefrontApi;
use storefront_commerce::cart::CartStore;
use storefront_commerce::CartController;
use storefront_data::FetchClient;
use tracing::warn;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Storage shared by every store built from this context.
    cache: OnceLock<Cache>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self::new(config, output, cwd))
    }

    pub fn new(config: CliConfig, output: Output, cwd: PathBuf) -> Self {
        Self {
            config,
            output,
            cwd,
            cache: OnceLock::new(),
        }
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }

    /// Cart store over the configured state file.
    ///
    /// The state file is opened on first use and every store shares it, so a
    /// fallback to memory lasts for the rest of the command.
    pub fn store(&self) -> CartStore {
        let cache = self
            .cache
            .get_or_init(|| open_cache(&self.resolve_path(&self.config.storage.path)));
        CartStore::new(cache.clone(), self.config.cart_config())
    }

    /// Controller wired to the configured backend.
    pub fn controller(&self) -> CartController {
        let client = FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_default_header("Accept", "application/json");
        CartController::with_api(self.store(), HttpStorefrontApi::new(client))
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

/// Cache over the state file, degrading to memory if it cannot be used.
fn open_cache(path: &Path) -> Cache {
    match FileBackend::open(path) {
        Ok(file) => Cache::new(FallbackBackend::new(file)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file unavailable, cart will not persist");
            Cache::new(FallbackBackend::memory_only())
        }
    }
}
