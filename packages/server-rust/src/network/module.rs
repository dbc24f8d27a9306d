//! Network module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown signal fires. The
//! split lets callers learn the bound port (port 0 = OS-assigned) before
//! traffic starts.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use abacus_core::ModuleGroup;

use super::config::NetworkConfig;
use super::handlers::{
    call_handler, functions_handler, health_handler, liveness_handler, readiness_handler,
    ApiDoc, AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;

/// Manages the HTTP server lifecycle around one immutable module group.
pub struct NetworkModule {
    config: NetworkConfig,
    group: Arc<ModuleGroup>,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, group: Arc<ModuleGroup>) -> Self {
        Self {
            config,
            group,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /functions` -- operation listing (names or indices)
    /// - `GET /call/{function}` -- invoke by name or index
    /// - `GET /health`, `/health/live`, `/health/ready` -- health probes
    /// - `GET /docs` -- interactive OpenAPI documentation
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            group: Arc::clone(&self.group),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            start_time: Instant::now(),
        };

        let layers = build_http_layers(&self.config);

        Router::new()
            .route("/functions", get(functions_handler))
            .route("/call/{function}", get(call_handler))
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .with_state(state)
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(layers)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured
    /// one when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g. port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown future completes, then drains
    /// in-flight requests for up to the configured drain timeout.
    ///
    /// Consumes `self` because the listener moves into the server.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O failure.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let shutdown_ctrl = self.shutdown;
        let drain_timeout = self.config.drain_timeout;

        // Transition to Ready so readiness probes pass.
        shutdown_ctrl.set_ready();
        info!("serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        shutdown_ctrl.trigger_shutdown();
        if shutdown_ctrl.wait_for_drain(drain_timeout).await {
            info!("all in-flight requests drained");
        } else {
            warn!("drain timeout expired with requests still in flight");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use abacus_core::standard_group;

    use super::*;

    fn test_module() -> NetworkModule {
        NetworkModule::new(NetworkConfig::default(), Arc::new(standard_group()))
    }

    #[test]
    fn new_creates_module_without_binding() {
        let module = test_module();
        assert!(module.listener.is_none());
    }

    #[test]
    fn shutdown_controller_returns_shared_arc() {
        let module = test_module();
        let first = module.shutdown_controller();
        let second = module.shutdown_controller();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn build_router_creates_router() {
        let module = test_module();
        let _router = module.build_router();
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = test_module();
        let port = module.start().await.expect("start should succeed");
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "start() must be called before serve()")]
    async fn serve_panics_without_start() {
        let module = test_module();
        let _ = module.serve(std::future::pending::<()>()).await;
    }

    // -----------------------------------------------------------------------
    // End-to-end router tests
    // -----------------------------------------------------------------------

    mod routes {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        use super::*;

        async fn fetch(uri: &str) -> (StatusCode, serde_json::Value) {
            let router = test_module().build_router();
            let response = router
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            (status, json)
        }

        #[tokio::test]
        async fn functions_lists_every_operation() {
            let expected = standard_group().len();
            let (status, json) = fetch("/functions").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json.as_array().unwrap().len(), expected);
            assert_eq!(json[0], "natural_compare");
        }

        #[tokio::test]
        async fn functions_as_indices_lists_positions() {
            let (status, json) = fetch("/functions?as_indices=true").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json[0], "0");
            assert_eq!(json[1], "1");
        }

        #[tokio::test]
        async fn call_dispatches_end_to_end() {
            let (status, json) = fetch("/call/natural_add?args=2&args=3").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["result"], "5");
        }

        #[tokio::test]
        async fn call_by_index_dispatches_end_to_end() {
            // integer_negate sits at index 12 in the standard registry.
            let (status, json) = fetch("/call/12?args=4").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["result"], "-4");
        }

        #[tokio::test]
        async fn call_without_args_reports_arity_mismatch() {
            let (status, json) = fetch("/call/natural_add").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                json["detail"],
                "invalid argument count: expected 2, got 0"
            );
        }

        #[tokio::test]
        async fn unknown_function_is_bad_request() {
            let (status, json) = fetch("/call/frobnicate").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["detail"], "function 'frobnicate' is not implemented");
        }

        #[tokio::test]
        async fn domain_failure_is_bad_request_with_detail() {
            let (status, json) = fetch("/call/natural_divide?args=1&args=0").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["detail"], "natural division by zero");
        }

        #[tokio::test]
        async fn health_endpoint_reports_state() {
            let (status, json) = fetch("/health").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["state"], "starting");
        }

        #[tokio::test]
        async fn openapi_document_is_served() {
            let (status, json) = fetch("/api-docs/openapi.json").await;
            assert_eq!(status, StatusCode::OK);
            assert!(json["paths"]["/call/{function}"].is_object());
        }
    }
}
