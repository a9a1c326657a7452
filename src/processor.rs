//! Direct processor
//!
//! Hands every scan of a batch straight to the configured targets. There is
//! no queue, no deduplication and no retry: the first failure rejects the
//! whole batch and the trigger answers with an error.

use std::sync::Arc;

use log::{debug, error};

use crate::error::{RescanError, Result};
use crate::models::Scan;
use crate::targets::Target;
use crate::triggers::ProcessorFunc;

/// Synchronous fan-out to every target
#[derive(Clone, Default)]
pub struct Processor {
    targets: Vec<Arc<dyn Target>>,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.targets.iter().map(|t| t.name()).collect();
        f.debug_struct("Processor").field("targets", &names).finish()
    }
}

impl Processor {
    /// Create a processor over the given targets
    pub fn new(targets: Vec<Arc<dyn Target>>) -> Self {
        Self { targets }
    }

    /// Number of targets
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Deliver a batch to every target in order
    ///
    /// Each target is probed once per batch before its scans are sent.
    pub fn process(&self, scans: &[Scan]) -> Result<()> {
        if scans.is_empty() {
            return Ok(());
        }

        for target in &self.targets {
            target.available().map_err(|e| {
                error!("Target {} is not available: {}", target.name(), e);
                e
            })?;

            for scan in scans {
                debug!("Dispatching {} to {}", scan.folder, target.name());
                target.scan(scan)?;
            }
        }
        Ok(())
    }

    /// Wrap the processor as a trigger callback
    pub fn into_func(self) -> ProcessorFunc {
        Arc::new(move |scans: Vec<Scan>| {
            self.process(&scans).map_err(|e| {
                RescanError::processor_error(format!("failed processing {} scans: {}", scans.len(), e))
            })
        })
    }
}
