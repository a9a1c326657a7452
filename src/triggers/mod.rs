//! Inbound webhook triggers
//!
//! A trigger turns an external notification into [`Scan`]s and hands the
//! whole batch to the processor callback, waiting for its answer before
//! responding.

pub mod a_train;

use std::sync::Arc;

use axum::Router;

use crate::error::Result;
use crate::models::Scan;

pub use a_train::ATrainTrigger;

/// Processor callback receiving one batch of scans per request
///
/// The callback may block; triggers run it on a blocking thread.
pub type ProcessorFunc = Arc<dyn Fn(Vec<Scan>) -> Result<()> + Send + Sync>;

/// Capability shared by every HTTP trigger
pub trait HttpTrigger: Send + Sync {
    /// Short name used in logs and as the route segment
    fn name(&self) -> &str;

    /// Routes handling this trigger's webhooks, relative to its mount point
    fn routes(&self, processor: ProcessorFunc) -> Router;
}
