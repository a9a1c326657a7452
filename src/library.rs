//! Library resolution
//!
//! Picks the library that owns a folder. Roots may overlap; the first
//! library in the supplied order whose path prefixes the folder wins.

use crate::error::{RescanError, Result};
use crate::models::Library;

/// Resolve the library owning `folder`
///
/// Returns a `NotFound` error when no library path is a prefix of the folder.
pub fn resolve<'a>(libraries: &'a [Library], folder: &str) -> Result<&'a Library> {
    libraries
        .iter()
        .find(|lib| lib.owns(folder))
        .ok_or_else(|| RescanError::not_found(folder))
}
