//! Webhook server
//!
//! Mounts every trigger under `/triggers/<name>` and serves until Ctrl-C.

use axum::{http::StatusCode, routing::get, Router};
use log::{info, warn};

use crate::error::Result;
use crate::triggers::{HttpTrigger, ProcessorFunc};

/// Build the router for the given triggers
pub fn router(triggers: &[Box<dyn HttpTrigger>], processor: ProcessorFunc) -> Router {
    let mut router = Router::new().route("/health", get(|| async { StatusCode::OK }));

    for trigger in triggers {
        let mount = format!("/triggers/{}", trigger.name());
        info!("Mounting trigger {} at {}", trigger.name(), mount);
        router = router.nest(&mount, trigger.routes(processor.clone()));
    }

    router
}

/// Serve `router` on `address` until Ctrl-C is received
pub async fn serve(address: &str, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed listening for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ATrainConfig, DriveConfig};
    use crate::models::Scan;
    use crate::triggers::ATrainTrigger;
    use axum::{body::Body, http::Request};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn app(calls: Arc<Mutex<Vec<Scan>>>) -> Router {
        let config = ATrainConfig::default().add_drive(DriveConfig::new("d1").add_rewrite("^/a", "/x"));
        let triggers: Vec<Box<dyn HttpTrigger>> = vec![Box::new(ATrainTrigger::new(&config).unwrap())];
        let processor: ProcessorFunc = Arc::new(move |scans: Vec<Scan>| {
            calls.lock().unwrap().extend(scans);
            Ok(())
        });
        router(&triggers, processor)
    }

    #[tokio::test]
    async fn test_trigger_mounted_with_drive() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let response = app(calls.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/triggers/a-train/d1")
                    .body(Body::from(r#"{"Created":["/a/Movies"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.lock().unwrap()[0].folder, "/x/Movies");
    }

    #[tokio::test]
    async fn test_get_on_trigger_not_allowed() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let response = app(calls.clone())
            .oneshot(
                Request::builder()
                    .uri("/triggers/a-train/d1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(Mutex::new(Vec::new())))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
