//! Shared utilities for integration tests.

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use prepared_response::config::ServerConfig;
use prepared_response::lifecycle::{prepare_artifacts, Shutdown};
use prepared_response::HttpServer;
use tokio::net::TcpListener;

/// Path to a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Prepare the configured artifacts and serve them on an ephemeral port.
///
/// The returned `Shutdown` stops the server when triggered.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let artifacts = prepare_artifacts(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, artifacts);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client without connection pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn gunzip(bytes: &[u8]) -> String {
    let mut out = String::new();
    GzDecoder::new(bytes).read_to_string(&mut out).unwrap();
    out
}
