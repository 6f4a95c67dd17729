use walmetrics_config::load_config;
use walmetrics_config::shared::LoaderConfig;

use crate::error::{LoaderError, LoaderResult};

/// Loads and validates the loader configuration.
///
/// Uses the standard configuration loading mechanism from
/// [`walmetrics_config`] and validates the resulting [`LoaderConfig`] before
/// returning it.
pub fn load_loader_config() -> LoaderResult<LoaderConfig> {
    let config = load_config::<LoaderConfig>().map_err(LoaderError::config)?;
    config.validate().map_err(LoaderError::config)?;

    Ok(config)
}
