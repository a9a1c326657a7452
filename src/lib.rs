//! Webhook-driven media library rescans
//!
//! Triggers turn inbound webhook events into normalized scans, rewriting
//! each path with per-source rules. Targets rewrite the path again into a
//! media server's own filesystem view, resolve the owning library and ask
//! the server to rescan the folder.

pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod models;
pub mod processor;
pub mod rewrite;
pub mod server;
pub mod targets;
pub mod triggers;

pub use config::{AppConfig, ATrainConfig, DriveConfig, EmbyConfig};
pub use error::{RescanError, RescanErrorKind, Result};
pub use models::{Library, RewriteRule, Scan};
pub use processor::Processor;
pub use rewrite::{DriveRewriter, Rewriter};
pub use targets::{EmbyTarget, Target};
pub use triggers::{ATrainTrigger, HttpTrigger, ProcessorFunc};
