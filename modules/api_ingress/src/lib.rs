//! HTTP host for the students server.
//!
//! Owns the listener and the cross-cutting tower stack; feature modules hand
//! in their routes as a plain [`axum::Router`].

use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn, response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod error;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;
use error::AppError;

pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Mount `routes` next to `/health` and wrap everything in the middleware stack.
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes)
            .fallback(web::not_found);

        // Layers are listed innermost first. From the outside in:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        //   -> Timeout -> CORS -> BodyLimit -> CatchPanic
        router = router.layer(CatchPanicLayer::custom(|_panic: Box<dyn Any + Send + 'static>| {
            AppError::Internal(anyhow::anyhow!("handler panicked")).into_response()
        }));
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            self.config.request_timeout_sec,
        )));
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());

        // Set must wrap Propagate so the generated id is on the request
        // before Propagate copies it onto the response.
        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `addr` and serve until `cancel` fires.
    pub async fn serve(&self, addr: SocketAddr, router: Router, cancel: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
        serve_listener(listener, router, cancel).await
    }
}

/// Serve on an already bound listener until `cancel` fires.
pub async fn serve_listener(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
