//! Entry point for loading configuration.

use super::merge::merge_policy;
use super::sources::global_file;
use super::SyncConfig;
use crate::error::SyncError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`SyncConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, `explicit` (if given) and environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<SyncConfig, SyncError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;

        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Loading explicit configuration file");
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let config: SyncConfig = builder
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()?;
        config.validated()
    }

    /// Load defaults plus a single file, ignoring global file and environment.
    pub fn load_from_file(path: &Path) -> Result<SyncConfig, SyncError> {
        let config: SyncConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()?
            .try_deserialize()?;
        config.validated()
    }

    /// Location of the user-level config file, if one can be resolved.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults with no file or environment input.
    pub fn defaults() -> SyncConfig {
        SyncConfig::default()
    }
}
