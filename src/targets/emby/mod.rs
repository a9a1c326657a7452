//! Emby target
//!
//! Rewrites each scan folder into the server's filesystem view, resolves the
//! owning library and asks Emby to refresh that folder.
//!
//! The library list is fetched once when the target is created and is never
//! refreshed. Libraries added on the server afterwards are only picked up on
//! restart.

pub mod api;

use log::{debug, error, info, warn};

use crate::config::EmbyConfig;
use crate::error::Result;
use crate::library;
use crate::models::{Library, Scan};
use crate::rewrite::Rewriter;
use crate::targets::Target;

pub use api::{EmbyApi, EmbyClient};

/// Target forwarding scans to one Emby server
pub struct EmbyTarget {
    url: String,
    libraries: Vec<Library>,
    rewrite: Rewriter,
    api: Box<dyn EmbyApi>,
}

impl std::fmt::Debug for EmbyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbyTarget")
            .field("url", &self.url)
            .field("libraries", &self.libraries)
            .field("rewrite", &self.rewrite)
            .finish_non_exhaustive()
    }
}

impl EmbyTarget {
    /// Create a target talking to the configured server over HTTP
    ///
    /// Blocks while the library list is fetched. Fails if a rewrite rule is
    /// invalid or the server cannot be queried.
    pub fn new(config: &EmbyConfig) -> Result<Self> {
        let rewrite = Rewriter::new(&config.rewrite)?;
        let api = EmbyClient::new(&config.url, &config.token);
        Self::build(config, rewrite, Box::new(api))
    }

    /// Create a target on top of an existing API implementation
    pub fn with_api(config: &EmbyConfig, api: Box<dyn EmbyApi>) -> Result<Self> {
        let rewrite = Rewriter::new(&config.rewrite)?;
        Self::build(config, rewrite, api)
    }

    fn build(config: &EmbyConfig, rewrite: Rewriter, api: Box<dyn EmbyApi>) -> Result<Self> {
        let libraries = api.libraries()?;
        debug!("Retrieved {} libraries from Emby {}: {:?}", libraries.len(), config.url, libraries);

        Ok(Self {
            url: config.url.clone(),
            libraries,
            rewrite,
            api,
        })
    }

    /// Libraries fetched at construction
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Base URL of the server
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Target for EmbyTarget {
    fn name(&self) -> &str {
        "emby"
    }

    fn available(&self) -> Result<()> {
        self.api.available()
    }

    fn scan(&self, scan: &Scan) -> Result<()> {
        let folder = self.rewrite.rewrite(&scan.folder);
        debug!(
            "Rewritten scan folder for Emby {}: {} -> {}",
            self.url, scan.folder, folder
        );

        let lib = match library::resolve(&self.libraries, &folder) {
            Ok(lib) => lib,
            Err(e) => {
                warn!("No target libraries found for Emby {}: {}", self.url, e);
                return Ok(());
            }
        };

        info!(
            "Sending scan request to Emby {} (library: {}, path: {})",
            self.url, lib.name, folder
        );

        if let Err(e) = self.api.scan(&folder) {
            error!(
                "Failed to send scan request to Emby {} (library: {}, path: {}): {}",
                self.url, lib.name, folder, e
            );
            return Err(e);
        }

        info!(
            "Scan request successfully sent to Emby {} (library: {}, path: {})",
            self.url, lib.name, folder
        );
        Ok(())
    }
}
