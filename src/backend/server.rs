use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::api::{self, AppState};
use super::store::{FlatFileStore, StoreHandle};

/// Configuration for the HelixDesk API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// Answer cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_file: PathBuf::from(".helixdesk/db.json"),
            cors: true,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the full application router with request tracing and optional CORS.
pub fn build_router(state: Arc<AppState>, cors: bool) -> Router {
    let mut app = api::api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

/// Open the data file named in `config` and wire it into a router.
pub fn app(config: &ServerConfig) -> Result<Router> {
    let store = FlatFileStore::open(&config.data_file).with_context(|| {
        format!("Failed to open data file {}", config.data_file.display())
    })?;
    let state = Arc::new(AppState::new(StoreHandle::new(store)));
    Ok(build_router(state, config.cors))
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

/// Start the HelixDesk API server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let app = app(&config)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr: SocketAddr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        data_file = %config.data_file.display(),
        cors = config.cors,
        "HelixDesk API running"
    );
    println!("HelixDesk API running at http://{}", local_addr);

    serve_on(listener, app, shutdown_signal()).await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server keeps running until killed.
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config(dir: &TempDir, cors: bool) -> ServerConfig {
        ServerConfig {
            data_file: dir.path().join("data/db.json"),
            cors,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.addr(), "127.0.0.1:3001");
        assert!(config.cors);
    }

    #[tokio::test]
    async fn test_app_creates_data_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, true);
        let _app = app(&config).unwrap();
        assert!(config.data_file.exists());
    }

    #[tokio::test]
    async fn test_health_via_full_router() {
        let dir = TempDir::new().unwrap();
        let app = app(&test_config(&dir, true)).unwrap();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_mounted() {
        let dir = TempDir::new().unwrap();
        let app = app(&test_config(&dir, true)).unwrap();
        let req = Request::builder()
            .uri("/api/customers")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = TempDir::new().unwrap();
        let app = app(&test_config(&dir, true)).unwrap();
        let req = Request::builder()
            .uri("/api/nothing-here")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_header_present_when_enabled() {
        let dir = TempDir::new().unwrap();
        let app = app(&test_config(&dir, true)).unwrap();
        let req = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_cors_header_absent_when_disabled() {
        let dir = TempDir::new().unwrap();
        let app = app(&test_config(&dir, false)).unwrap();
        let req = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_app_fails_on_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // A regular file where a parent directory is expected.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = ServerConfig {
            data_file: blocker.join("db.json"),
            ..Default::default()
        };
        assert!(app(&config).is_err());
    }
}
