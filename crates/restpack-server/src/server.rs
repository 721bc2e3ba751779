//! The API server and its start/shutdown coordinator.
//!
//! # Architecture
//!
//! ```text
//!   interrupt task ──stop (cap 1)──┐
//!                                  ├──▶ coordinator (select!)
//!   listener task ───err  (cap 1)──┘        │
//!        │                                  ├─ stop ▶ drain ▶ wait ≤ timeout ▶ Ok / ShutdownTimeout
//!        └─ accept ▶ connection tasks       └─ err  ▶ ServerError::Listen
//! ```
//!
//! The route table is frozen behind an `Arc` when `start` is called, so no
//! route can be added while serving.
//!
//! # Example
//!
//! ```rust,ignore
//! use restpack_server::ApiServer;
//! use restpack_extract::{write_json, ApiRequest};
//! use http::{Method, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restpack_server::ServerError> {
//!     let logger = restpack_telemetry::build_dispatch(&Default::default()).unwrap();
//!     let mut server = ApiServer::new("0.0.0.0:8080", "/api/v1", logger);
//!
//!     server.register_route("/ping", |_req: ApiRequest| async {
//!         write_json(StatusCode::OK, &"pong")
//!     }, &[Method::GET]);
//!
//!     server.start(None).await
//! }
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::{Method, Request};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use restpack_extract::{bad_request, ApiRequest, HttpResponse};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::{handler_fn, Handler};
use crate::lifecycle::{ServerState, StateWatcher};
use crate::routes::RouteTable;
use crate::shutdown::{self, ConnectionToken, ConnectionTracker, ShutdownSignal};

/// An HTTP server with a route table and graceful shutdown.
///
/// Construct it, register routes, then call [`start`](Self::start), which
/// consumes the server and returns after shutdown.
pub struct ApiServer {
    config: ServerConfig,
    routes: RouteTable,
    logger: Dispatch,
    state: watch::Sender<ServerState>,
}

impl ApiServer {
    /// Creates a server listening on `bind_addr` with routes mounted under
    /// `path_prefix` (empty for none).
    #[must_use]
    pub fn new(bind_addr: impl Into<String>, path_prefix: impl Into<String>, logger: Dispatch) -> Self {
        let config = ServerConfig::builder()
            .bind_addr(bind_addr)
            .path_prefix(path_prefix)
            .build();
        Self::with_config(config, logger)
    }

    /// Creates a server from a full configuration.
    #[must_use]
    pub fn with_config(config: ServerConfig, logger: Dispatch) -> Self {
        let (state, _) = watch::channel(ServerState::Idle);
        Self {
            routes: RouteTable::new(config.path_prefix()),
            config,
            logger,
            state,
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registered routes.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Watches the run state. Take this before calling `start`.
    #[must_use]
    pub fn state(&self) -> StateWatcher {
        StateWatcher::new(self.state.subscribe())
    }

    /// Registers an async function for `path` and `methods` (empty for all
    /// methods).
    pub fn register_route<F, Fut>(&mut self, path: &str, handler: F, methods: &[Method])
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HttpResponse> + Send + 'static,
    {
        self.register_handler(path, Some(handler_fn(handler)), methods);
    }

    /// Registers an already-erased handler.
    ///
    /// An empty path or a `None` handler is logged and ignored.
    pub fn register_handler(&mut self, path: &str, handler: Option<Handler>, methods: &[Method]) {
        let full = self.routes.full_path(path);
        let result = self.routes.register(path, handler, methods);
        let methods = method_list(methods);

        tracing::dispatcher::with_default(&self.logger, || match result {
            Ok(conflicts) => {
                if !conflicts.is_empty() {
                    tracing::warn!(
                        path = %full,
                        methods = ?conflicts.methods,
                        "route already registered; keeping the first binding"
                    );
                }
                tracing::info!(path = %full, methods = %methods, "route registered");
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "route registration rejected");
            }
        });
    }

    /// Serves until an OS interrupt (SIGINT, or SIGTERM on unix), then
    /// shuts down gracefully.
    ///
    /// `timeout` bounds the graceful shutdown; `None` or zero uses the
    /// configured default.
    pub async fn start(self, timeout: Option<Duration>) -> Result<(), ServerError> {
        let interrupt = shutdown::interrupt().map_err(ServerError::Signal)?;
        self.start_with_interrupt(timeout, interrupt).await
    }

    /// Same as [`start`](Self::start) with the interrupt supplied by the
    /// caller.
    pub async fn start_with_interrupt<F>(self, timeout: Option<Duration>, interrupt: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let timeout = timeout
            .filter(|t| !t.is_zero())
            .unwrap_or_else(|| self.config.shutdown_timeout());
        let logger = self.logger.clone();
        self.run(timeout, interrupt).with_subscriber(logger).await
    }

    async fn run<F>(self, timeout: Duration, interrupt: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            config,
            routes,
            state,
            ..
        } = self;

        let addr = match resolve_bind_addr(config.bind_addr()) {
            Ok(addr) => addr,
            Err(e) => {
                state.send_replace(ServerState::Terminated { clean: false });
                return Err(e);
            }
        };

        tracing::info!(addr = %addr, routes = routes.len(), "starting server");

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let (err_tx, mut err_rx) = mpsc::channel::<ServerError>(1);

        let drain = ShutdownSignal::new();
        let force = ShutdownSignal::new();
        let tracker = ConnectionTracker::new();

        let interrupt_task = tokio::spawn(
            async move {
                interrupt.await;
                let _ = stop_tx.try_send(());
            }
            .with_current_subscriber(),
        );

        let mut listener_task = tokio::spawn(
            listen(
                addr,
                Arc::new(routes),
                Shutdown {
                    drain: drain.clone(),
                    force: force.clone(),
                },
                tracker.clone(),
                state.clone(),
                err_tx,
            )
            .with_current_subscriber(),
        );

        let outcome = tokio::select! {
            Some(err) = err_rx.recv() => {
                tracing::error!(error = %err, "listener failed");
                Err(err)
            }
            Some(()) = stop_rx.recv() => {
                graceful_shutdown(&state, &drain, &force, &tracker, &mut listener_task, timeout).await
            }
            else => {
                graceful_shutdown(&state, &drain, &force, &tracker, &mut listener_task, timeout).await
            }
        };

        interrupt_task.abort();
        listener_task.abort();

        state.send_replace(ServerState::Terminated {
            clean: outcome.is_ok(),
        });
        outcome
    }
}

impl std::fmt::Debug for ApiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiServer")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

/// Drain and force signals handed to the listener.
#[derive(Clone)]
struct Shutdown {
    drain: ShutdownSignal,
    force: ShutdownSignal,
}

async fn graceful_shutdown(
    state: &watch::Sender<ServerState>,
    drain: &ShutdownSignal,
    force: &ShutdownSignal,
    tracker: &ConnectionTracker,
    listener_task: &mut JoinHandle<()>,
    timeout: Duration,
) -> Result<(), ServerError> {
    state.send_replace(ServerState::ShuttingDown);
    tracing::info!(
        active_connections = tracker.active_connections(),
        timeout = ?timeout,
        "shutting down gracefully"
    );
    drain.trigger();

    match tokio::time::timeout(timeout, listener_task).await {
        Ok(Ok(())) => {
            tracing::info!("server stopped gracefully");
            return Ok(());
        }
        Ok(Err(e)) => {
            force.trigger();
            tracing::error!(error = %e, "listener task failed during shutdown");
            return Err(ServerError::ListenerFailed(e));
        }
        Err(_) => {}
    }

    let active = tracker.active_connections();
    force.trigger();
    tracing::warn!(active_connections = active, "shutdown deadline reached; closing remaining connections");
    Err(ServerError::ShutdownTimeout { timeout, active })
}

/// Binds, publishes the bound address, and accepts until drained. Bind
/// failures go to `err_tx`.
async fn listen(
    addr: String,
    routes: Arc<RouteTable>,
    shutdown: Shutdown,
    tracker: ConnectionTracker,
    state: watch::Sender<ServerState>,
    err_tx: mpsc::Sender<ServerError>,
) {
    let bound = match TcpListener::bind(&addr).await {
        Ok(listener) => listener.local_addr().map(|local| (listener, local)),
        Err(e) => Err(e),
    };
    let (listener, local_addr) = match bound {
        Ok(bound) => bound,
        Err(source) => {
            let _ = err_tx.try_send(ServerError::Listen { addr, source });
            return;
        }
    };

    state.send_replace(ServerState::Serving { local_addr });
    tracing::info!(addr = %local_addr, "server listening");

    let mut connections = JoinSet::new();
    let mut stop = shutdown.drain.recv();

    loop {
        tokio::select! {
            () = &mut stop => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, remote)) => {
                    let token = tracker.acquire();
                    connections.spawn(
                        serve_connection(stream, remote, Arc::clone(&routes), shutdown.clone(), token)
                            .with_current_subscriber(),
                    );
                }
                Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    tracing::debug!(active_connections = tracker.active_connections(), "listener closed; draining");
    tracker.wait_idle().await;
    while connections.join_next().await.is_some() {}
}

async fn serve_connection(
    stream: TcpStream,
    remote: SocketAddr,
    routes: Arc<RouteTable>,
    shutdown: Shutdown,
    _token: ConnectionToken,
) {
    let service = service_fn(move |req: Request<Incoming>| {
        let routes = Arc::clone(&routes);
        async move { Ok::<_, Infallible>(handle_request(&routes, req).await) }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let mut drain = shutdown.drain.recv();
    let mut force = shutdown.force.recv();
    let mut draining = false;

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(%remote, error = %e, "connection error");
                }
                break;
            }
            () = &mut drain, if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
            () = &mut force => {
                tracing::debug!(%remote, "connection force-closed");
                break;
            }
        }
    }
}

async fn handle_request(routes: &RouteTable, req: Request<Incoming>) -> HttpResponse {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            return bad_request("", None);
        }
    };
    routes.dispatch(ApiRequest::from_parts(parts, body)).await
}

/// `:port` binds every interface.
fn resolve_bind_addr(raw: &str) -> Result<String, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServerError::InvalidAddress(raw.to_string()));
    }
    if raw.starts_with(':') {
        Ok(format!("0.0.0.0{raw}"))
    } else {
        Ok(raw.to_string())
    }
}

fn method_list(methods: &[Method]) -> String {
    if methods.is_empty() {
        return "*".to_string();
    }
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
