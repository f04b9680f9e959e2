//! Development server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "404 - Sidan finns inte";

/// Request paths ending in one of these are served as is; anything else is
/// treated as a directory holding `index.html`.
const FILE_EXTENSIONS: &[&str] = &[".css", ".html", ".js"];

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory to serve
    pub root: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("out"),
            port: 8080,
            host: "127.0.0.1".to_string(),
            open: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Shared server state.
struct ServerState {
    root: PathBuf,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }

    /// Serve until `shutdown` completes.
    pub async fn start(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!(
            "Serving {} at http://{}",
            self.config.root.display(),
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, router(self.config.root))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

/// Routes serving files below `root`.
pub fn router(root: impl Into<PathBuf>) -> Router {
    let state = Arc::new(ServerState { root: root.into() });

    Router::new()
        .route("/", get(index_handler))
        .route("/{*path}", get(file_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    serve(&state.root, "").await
}

async fn file_handler(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Response {
    serve(&state.root, &path).await
}

async fn serve(root: &FsPath, request_path: &str) -> Response {
    let Some(relative) = resolve(request_path) else {
        return not_found();
    };

    match tokio::fs::read(root.join(&relative)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&relative))], bytes).into_response(),
        Err(e) => {
            tracing::debug!("{}: {}", relative.display(), e);
            not_found()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

/// Map a request path to a file below the served root.
///
/// Returns `None` for paths that try to leave the root.
pub fn resolve(request_path: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = request_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.iter().any(|s| *s == ".." || s.contains('\\')) {
        return None;
    }

    let mut path: PathBuf = segments.iter().collect();
    let is_file = segments
        .last()
        .is_some_and(|last| FILE_EXTENSIONS.iter().any(|ext| last.ends_with(ext)));
    if !is_file {
        path.push("index.html");
    }

    Some(path)
}

fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        _ => "text/html",
    }
}
