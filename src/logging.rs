//! Logger setup
//!
//! The global level comes from the config (or `RUST_LOG`), and each adapter
//! may raise or lower its own module's level through its `verbosity` setting.

use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::config::AppConfig;
use crate::error::{RescanError, Result};

/// Module path of the Emby target, used as its log filter
pub const EMBY_MODULE: &str = "media_rescan::targets::emby";

/// Module path of the A-Train trigger, used as its log filter
pub const A_TRAIN_MODULE: &str = "media_rescan::triggers::a_train";

/// Parse a verbosity setting
///
/// An empty string means "inherit" and yields `None`.
pub fn parse_verbosity(verbosity: &str) -> Result<Option<LevelFilter>> {
    let verbosity = verbosity.trim();
    if verbosity.is_empty() {
        return Ok(None);
    }
    verbosity
        .parse::<LevelFilter>()
        .map(Some)
        .map_err(|_| RescanError::config_error(format!("invalid verbosity: {verbosity:?}")))
}

/// Collect the per-module filters requested by the adapters in `config`
///
/// When several Emby targets set a level, the most verbose one wins since
/// they share a module.
pub fn module_filters(config: &AppConfig) -> Result<Vec<(&'static str, LevelFilter)>> {
    let mut filters = Vec::new();

    if let Some(a_train) = &config.triggers.a_train {
        if let Some(level) = parse_verbosity(&a_train.verbosity)? {
            filters.push((A_TRAIN_MODULE, level));
        }
    }

    let mut emby_level: Option<LevelFilter> = None;
    for emby in &config.targets.emby {
        if let Some(level) = parse_verbosity(&emby.verbosity)? {
            emby_level = Some(emby_level.map_or(level, |current| current.max(level)));
        }
    }
    if let Some(level) = emby_level {
        filters.push((EMBY_MODULE, level));
    }

    Ok(filters)
}

/// Initialize the global logger
///
/// `RUST_LOG` takes precedence over the configured global level.
pub fn init(config: &AppConfig) -> Result<()> {
    let global = parse_verbosity(&config.verbosity)?.unwrap_or(LevelFilter::Info);
    let filters = module_filters(config)?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(global.as_str()));
    for (module, level) in filters {
        builder.filter_module(module, level);
    }
    builder
        .try_init()
        .map_err(|e| RescanError::config_error(format!("failed initializing logger: {e}")))
}
