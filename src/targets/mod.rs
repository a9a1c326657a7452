//! Media server targets
//!
//! A target receives normalized [`Scan`]s and forwards them to one media
//! server. Calls are blocking; run them off the async runtime.

pub mod emby;

use crate::error::Result;
use crate::models::Scan;

pub use emby::EmbyTarget;

/// Capability shared by every media server target
pub trait Target: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Probe whether the server is reachable
    fn available(&self) -> Result<()>;

    /// Ask the server to rescan the scan's folder
    ///
    /// A folder no library owns is not an error: the target logs it and
    /// returns `Ok(())`.
    fn scan(&self, scan: &Scan) -> Result<()>;
}
