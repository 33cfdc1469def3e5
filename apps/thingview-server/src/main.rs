//! Static file server: `GET /` serves the page shell, `GET /dist/*` serves
//! bundled assets. Nothing else is routed.

use anyhow::Context;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thingview-server", about = "Serve the thingview page and bundle")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Address to bind [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on [default: 3000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding index.html and dist/ [default: .]
    #[arg(long)]
    root: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
    root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("."),
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let defaults = Self::default();
        Self {
            host: cli.host.unwrap_or(defaults.host),
            port: cli.port.unwrap_or(defaults.port),
            root: cli.root.unwrap_or(defaults.root),
        }
    }
}

impl ServerConfig {
    fn addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .host
            .parse()
            .with_context(|| format!("invalid host address '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn router(root: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(root.join("index.html")))
        .nest_service("/dist", ServeDir::new(root.join("dist")))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = ServerConfig::from(cli);
    let addr = config.addr()?;
    if !config.root.join("index.html").is_file() {
        tracing::warn!(root = %config.root.display(), "no index.html under root; GET / will 404");
    }

    let app = router(&config.root);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Server started on port {}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"game-window\"></div>").unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        std::fs::write(dir.path().join("dist/main.js"), "console.log('frame');").unwrap();
        dir
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn root_serves_index() {
        let dir = site();
        let (status, body) = get(router(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("game-window"));
    }

    #[tokio::test]
    async fn dist_serves_bundle_files() {
        let dir = site();
        let (status, body) = get(router(dir.path()), "/dist/main.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log('frame');");
    }

    #[tokio::test]
    async fn missing_dist_file_is_not_found() {
        let dir = site();
        let (status, _) = get(router(dir.path()), "/dist/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_routes_are_not_found() {
        let dir = site();
        let (status, _) = get(router(dir.path()), "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get(router(dir.path()), "/api").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dist_does_not_escape_root() {
        let dir = site();
        let (status, _) = get(router(dir.path()), "/dist/../index.html").await;
        assert_ne!(status, StatusCode::OK);
    }

    #[test]
    fn default_config_listens_on_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.addr().unwrap(), "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn cli_maps_to_config() {
        let cli = Cli::parse_from(["thingview-server", "--port", "8080", "--root", "site"]);
        let config = ServerConfig::from(cli);
        assert_eq!(config.port, 8080);
        assert_eq!(config.root, PathBuf::from("site"));
        assert_eq!(config.host, "127.0.0.1");
        assert!(ServerConfig { host: "not an ip".into(), ..config }.addr().is_err());
    }
}
