//! HTTP server and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Match each request against the published route table
//! - Resolve the matched backend id and forward to its origin
//! - Apply configuration updates by atomically swapping the table
//!
//! # Design Decisions
//! - The matching core stays synchronous and pure; this module owns all
//!   the async machinery around it
//! - Handlers read the table through an atomic snapshot, never a lock
//! - Unmatched is an expected outcome mapped to 404, not an error path
//! - A config update that fails validation or table compilation keeps the
//!   current snapshot live

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::uri::{Authority, Scheme},
    http::{header::HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::{validate_config, RouterConfig};
use crate::dispatch::backend::BackendRegistry;
use crate::observability::metrics;
use crate::routing::{RouteTable, TableBuildError};

/// Immutable routing state published to request handlers.
///
/// Rebuilt wholesale from each accepted configuration and swapped in
/// atomically; in-flight requests keep reading the snapshot they started
/// with.
#[derive(Debug)]
pub struct RoutingSnapshot {
    pub table: RouteTable,
    pub backends: BackendRegistry,
}

impl RoutingSnapshot {
    fn from_config(config: &RouterConfig) -> Result<Self, TableBuildError> {
        Ok(Self {
            table: RouteTable::from_config(&config.routes)?,
            backends: BackendRegistry::from_config(&config.backends),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<ArcSwap<RoutingSnapshot>>,
    client: Client<HttpConnector, Body>,
}

/// UUID v4 request ids for the `x-request-id` header.
#[derive(Clone, Copy, Default)]
struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP server for the edge router.
pub struct RouterServer {
    router: Router,
    state: AppState,
}

impl RouterServer {
    /// Create a new server from a validated configuration.
    ///
    /// Fails when the route table cannot be compiled; a process must not
    /// start serving with a table it could not validate.
    pub fn new(config: RouterConfig) -> Result<Self, TableBuildError> {
        let snapshot = RoutingSnapshot::from_config(&config)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            snapshot: Arc::new(ArcSwap::from_pointee(snapshot)),
            client,
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, state })
    }

    /// Number of compiled routes currently published.
    pub fn route_count(&self) -> usize {
        self.state.snapshot.load().table.len()
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(MakeUuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until shutdown, applying config updates as they
    /// arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Edge router listening");

        let snapshot = self.state.snapshot.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_config(&snapshot, &config);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Edge router stopped");
        Ok(())
    }
}

/// Rebuild the routing snapshot from an updated configuration.
///
/// Rejected updates leave the current snapshot untouched.
fn apply_config(snapshot: &ArcSwap<RoutingSnapshot>, config: &RouterConfig) {
    if let Err(errors) = validate_config(config) {
        for error in &errors {
            tracing::error!(error = %error, "Config update failed validation");
        }
        tracing::error!("Rejected config update; keeping current route table");
        return;
    }

    match RoutingSnapshot::from_config(config) {
        Ok(next) => {
            tracing::info!(
                routes = next.table.len(),
                backends = next.backends.len(),
                "Route table rebuilt from config update"
            );
            snapshot.store(Arc::new(next));
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected config update; keeping current route table");
        }
    }
}

/// Main dispatch handler: match the path, resolve the backend, forward.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> impl IntoResponse {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    // The snapshot guard is dropped before any await point; the handler
    // keeps only owned copies of what it needs from the matched entry.
    let (route_prefix, origin) = {
        let snapshot = state.snapshot.load();

        let Some(route) = snapshot.table.match_path(&path) else {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(&method, 404, "unmatched", start_time);
            return (StatusCode::NOT_FOUND, "No matching route").into_response();
        };

        tracing::debug!(
            request_id = %request_id,
            path = %path,
            prefix = %route.prefix,
            backend = %route.backend_id,
            "Route matched"
        );

        let Some(origin) = snapshot.backends.get(&route.backend_id) else {
            tracing::error!(
                request_id = %request_id,
                backend = %route.backend_id,
                "Matched backend id has no registered origin"
            );
            metrics::record_request(&method, 502, &route.prefix, start_time);
            return (StatusCode::BAD_GATEWAY, "Unknown backend").into_response();
        };

        (route.prefix.clone(), origin.clone())
    };

    let Some(authority) = origin_authority(&origin) else {
        tracing::error!(request_id = %request_id, origin = %origin, "Origin has no usable authority");
        metrics::record_request(&method, 502, &route_prefix, start_time);
        return (StatusCode::BAD_GATEWAY, "Invalid backend origin").into_response();
    };

    // Rewrite authority only; path and query reach the origin untouched.
    let (mut parts, body) = request.into_parts();
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    let Ok(uri) = Uri::from_parts(uri_parts) else {
        tracing::error!(request_id = %request_id, path = %path, "Failed to rewrite request URI");
        metrics::record_request(&method, 502, &route_prefix, start_time);
        return (StatusCode::BAD_GATEWAY, "Invalid backend origin").into_response();
    };
    parts.uri = uri;

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), &route_prefix, start_time);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream request failed");
            metrics::record_request(&method, 502, &route_prefix, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Host[:port] authority for an origin URL.
fn origin_authority(origin: &Url) -> Option<Authority> {
    let host = origin.host_str()?;
    let authority = match origin.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Authority::from_str(&authority).ok()
}
