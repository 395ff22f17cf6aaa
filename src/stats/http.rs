//! # HTTP healthcheck and stats endpoint.
//!
//! [`HttpStats`] serves the service [`Stats`] on a TCP port:
//!
//! | request              | response                                     |
//! |----------------------|----------------------------------------------|
//! | `GET /healthcheck`   | `200 OK` if `stats.ok`, else `503`           |
//! | `GET /ok`            | same as `/healthcheck`                       |
//! | `GET /stats`         | `200` + JSON body, `503` if not serializable |
//! | `GET` anything else  | `404 Not Found`                              |
//! | any other method     | `501`                                        |
//!
//! The server starts in [`init`](StatsReporter::init) and is shut down
//! gracefully in [`exit`](StatsReporter::exit).

use std::net::{SocketAddr, TcpListener as StdListener};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Stats, StatsReporter, StatsSource};
use crate::error::StatsError;

/// Configuration of [`HttpStats`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpStatsConfig {
    /// Address to listen on. Port `0` is rejected by `init`.
    pub addr: SocketAddr,
}

impl HttpStatsConfig {
    /// Listens on all interfaces on `port`.
    pub fn port(port: u16) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }
}

type SharedSource = Arc<RwLock<StatsSource>>;

struct Running {
    token: CancellationToken,
    local_addr: SocketAddr,
}

/// Stats reporter backed by an axum HTTP server.
pub struct HttpStats {
    cfg: HttpStatsConfig,
    source: SharedSource,
    running: Mutex<Option<Running>>,
}

impl HttpStats {
    /// Creates a reporter; nothing is bound until `init`.
    pub fn new(cfg: HttpStatsConfig) -> Self {
        let fallback: StatsSource = Arc::new(|| Stats {
            ok: true,
            current_tasks: 0,
        });
        Self {
            cfg,
            source: Arc::new(RwLock::new(fallback)),
            running: Mutex::new(None),
        }
    }

    /// Stats as currently reported (the attached source, or `ok: true` before attach).
    pub fn current(&self) -> Stats {
        read_source(&self.source)
    }

    /// Bound address while the server is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|r| r.local_addr)
    }

    /// Router serving the endpoint table above.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.source))
    }

    fn bind(&self) -> Result<TcpListener, StatsError> {
        let bind_err = |e: std::io::Error| StatsError::Bind {
            addr: self.cfg.addr.to_string(),
            reason: e.to_string(),
        };
        let listener = StdListener::bind(self.cfg.addr).map_err(bind_err)?;
        listener.set_nonblocking(true).map_err(bind_err)?;
        TcpListener::from_std(listener).map_err(bind_err)
    }
}

impl StatsReporter for HttpStats {
    fn attach(&self, source: StatsSource) -> Result<(), StatsError> {
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = source;
        Ok(())
    }

    fn init(&self) -> Result<(), StatsError> {
        if self.cfg.addr.port() == 0 {
            return Err(StatsError::MissingPort);
        }

        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.is_some() {
            return Err(StatsError::AlreadyRunning);
        }

        let listener = self.bind()?;
        let local_addr = listener.local_addr().unwrap_or(self.cfg.addr);
        let token = CancellationToken::new();
        let app = self.router();
        let shutdown = token.clone().cancelled_owned();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                warn!(error = %e, "stats server stopped with error");
            }
        });

        info!(addr = %local_addr, "stats server listening");
        *running = Some(Running { token, local_addr });
        Ok(())
    }

    fn exit(&self) -> Result<(), StatsError> {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match running {
            Some(r) => {
                r.token.cancel();
                info!(addr = %r.local_addr, "stats server closed");
            }
            None => debug!("stats server was not running"),
        }
        Ok(())
    }
}

fn read_source(source: &SharedSource) -> Stats {
    let f = Arc::clone(&source.read().unwrap_or_else(PoisonError::into_inner));
    f()
}

fn router(source: SharedSource) -> Router {
    Router::new().fallback(handle).with_state(source)
}

async fn handle(State(source): State<SharedSource>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_IMPLEMENTED.into_response();
    }

    match uri.path() {
        "/ok" | "/healthcheck" => healthcheck(read_source(&source)),
        "/stats" => stats(read_source(&source)),
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "Not Found\n",
        )
            .into_response(),
    }
}

fn healthcheck(stats: Stats) -> Response {
    if stats.ok {
        (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "OK").into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

fn stats(stats: Stats) -> Response {
    match serde_json::to_string(&stats) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
