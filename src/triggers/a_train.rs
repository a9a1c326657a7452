//! A-Train webhook trigger
//!
//! A-Train posts `{"Created": [...], "Deleted": [...]}` to
//! `/triggers/a-train/{drive}` whenever files change on a shared drive.
//! Every path is rewritten with the drive's rules (or the global rules for
//! an unknown drive) and becomes one scan. Created and deleted paths are
//! treated alike; the processor decides what a deletion means.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Deserialize;

use crate::config::ATrainConfig;
use crate::error::{RescanError, Result};
use crate::models::Scan;
use crate::rewrite::DriveRewriter;
use crate::triggers::{HttpTrigger, ProcessorFunc};

/// Clock used to stamp scans
pub type Clock = fn() -> DateTime<Utc>;

/// Webhook payload sent by A-Train
#[derive(Debug, Deserialize)]
struct ATrainEvent {
    #[serde(rename = "Created", alias = "created", default)]
    created: Option<Vec<String>>,
    #[serde(rename = "Deleted", alias = "deleted", default)]
    deleted: Option<Vec<String>>,
}

/// Trigger for A-Train webhooks
#[derive(Debug, Clone)]
pub struct ATrainTrigger {
    priority: i32,
    rewrite: DriveRewriter,
    clock: Clock,
}

impl ATrainTrigger {
    /// Compile the trigger's rewrite rules
    pub fn new(config: &ATrainConfig) -> Result<Self> {
        let drives = config
            .drives
            .iter()
            .map(|drive| (drive.id.as_str(), drive.rewrite.as_slice()));
        let rewrite = DriveRewriter::new(drives, &config.rewrite)?;

        Ok(Self {
            priority: config.priority,
            rewrite,
            clock: Utc::now,
        })
    }

    /// Replace the clock used to stamp scans
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl HttpTrigger for ATrainTrigger {
    fn name(&self) -> &str {
        "a-train"
    }

    fn routes(&self, processor: ProcessorFunc) -> Router {
        let handler = Arc::new(Handler {
            priority: self.priority,
            rewrite: self.rewrite.clone(),
            clock: self.clock,
            processor,
        });

        Router::new()
            .route("/", post(handle_without_drive))
            .route("/{drive}", post(handle_with_drive))
            .with_state(handler)
    }
}

struct Handler {
    priority: i32,
    rewrite: DriveRewriter,
    clock: Clock,
    processor: ProcessorFunc,
}

impl Handler {
    /// Build the batch: created paths first, then deleted, each in order
    fn scans(&self, drive: Option<&str>, event: &ATrainEvent) -> Vec<Scan> {
        let created = event.created.iter().flatten().map(|p| ("Created", p));
        let deleted = event.deleted.iter().flatten().map(|p| ("Deleted", p));

        created
            .chain(deleted)
            .map(|(kind, path)| {
                let rewritten = self.rewrite.rewrite(drive, path);
                debug!("{} scan: {} -> {}", kind, path, rewritten);
                Scan::at(rewritten, self.priority, (self.clock)())
            })
            .collect()
    }

    async fn handle(&self, drive: Option<String>, body: Bytes) -> StatusCode {
        info!(
            "Received A-Train request (drive: {})",
            drive.as_deref().unwrap_or("")
        );

        let event: ATrainEvent = match serde_json::from_slice(&body) {
            Ok(event) => event,
            Err(e) => {
                error!("Failed decoding request: {}", RescanError::from(e));
                return StatusCode::BAD_REQUEST;
            }
        };
        debug!("Received JSON body: {:?}", event);

        let scans = self.scans(drive.as_deref(), &event);
        let folders: Vec<String> = scans.iter().map(|s| s.folder.clone()).collect();

        let processor = Arc::clone(&self.processor);
        let result = tokio::task::spawn_blocking(move || processor(scans))
            .await
            .unwrap_or_else(|e| Err(RescanError::processor_error(e.to_string())));

        if let Err(e) = result {
            error!("Processor could not process scans: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        for folder in folders {
            info!("Scan moved to processor: {}", folder);
        }
        StatusCode::OK
    }
}

async fn handle_with_drive(
    State(handler): State<Arc<Handler>>,
    Path(drive): Path<String>,
    body: Bytes,
) -> StatusCode {
    handler.handle(Some(drive), body).await
}

async fn handle_without_drive(State(handler): State<Arc<Handler>>, body: Bytes) -> StatusCode {
    handler.handle(None, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriveConfig;
    use axum::{body::Body, http::Request};
    use chrono::TimeZone;
    use std::sync::Mutex;
    use tower::ServiceExt;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn config() -> ATrainConfig {
        ATrainConfig::default()
            .priority(3)
            .add_drive(DriveConfig::new("d1").add_rewrite("^/a", "/x"))
    }

    fn recording() -> (ProcessorFunc, Arc<Mutex<Vec<Vec<Scan>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let processor: ProcessorFunc = Arc::new(move |scans: Vec<Scan>| {
            sink.lock().unwrap().push(scans);
            Ok(())
        });
        (processor, calls)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_drive_rewrite_and_order() {
        let trigger = ATrainTrigger::new(&config()).unwrap().with_clock(fixed_now);
        let (processor, calls) = recording();

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/d1", r#"{"Created":["/a"],"Deleted":["/b"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![Scan::at("/x", 3, fixed_now()), Scan::at("/b", 3, fixed_now())]
        );
    }

    #[tokio::test]
    async fn test_unknown_drive_uses_global_rules() {
        let config = config().add_rewrite("^/a", "/global");
        let trigger = ATrainTrigger::new(&config).unwrap();
        let (processor, calls) = recording();

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/unknown", r#"{"Created":["/a/Movies"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.lock().unwrap()[0][0].folder, "/global/Movies");
    }

    #[tokio::test]
    async fn test_no_drive_uses_global_rules() {
        let config = config().add_rewrite("^/a", "/global");
        let trigger = ATrainTrigger::new(&config).unwrap();
        let (processor, calls) = recording();

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/", r#"{"created":["/a"],"deleted":null}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].folder, "/global");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let trigger = ATrainTrigger::new(&config()).unwrap();
        let (processor, calls) = recording();

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/d1", r#"{"Created": ["/a""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_bad_request() {
        let trigger = ATrainTrigger::new(&config()).unwrap();
        let (processor, calls) = recording();

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/d1", r#"{"Created": "/a"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_processor_error_is_server_error() {
        let trigger = ATrainTrigger::new(&config()).unwrap();
        let attempts = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&attempts);
        let processor: ProcessorFunc = Arc::new(move |_scans: Vec<Scan>| {
            *counter.lock().unwrap() += 1;
            Err(RescanError::processor_error("target unavailable"))
        });

        let response = trigger
            .routes(processor)
            .oneshot(post_json("/d1", r#"{"Created":["/a"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(*attempts.lock().unwrap(), 1);
    }

    #[test]
    fn test_invalid_drive_rule_fails() {
        let config = ATrainConfig::default().add_drive(DriveConfig::new("d1").add_rewrite("[", "/x"));
        assert!(ATrainTrigger::new(&config).is_err());
    }

    #[test]
    fn test_name() {
        let trigger = ATrainTrigger::new(&ATrainConfig::default()).unwrap();
        assert_eq!(trigger.name(), "a-train");
    }
}
