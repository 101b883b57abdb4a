use std::path::Path;
use tempfile::TempDir;
use textgen_demo::{
    client::HttpGenerationClient,
    config::{ClientConfig, HostConfig},
};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";

/// Create a client pointed at a mock backend
pub fn create_test_client(server: &MockServer) -> HttpGenerationClient {
    HttpGenerationClient::new(ClientConfig::new(server.uri(), TEST_API_KEY))
}

/// Base URL on a loopback port that was just released, so connecting fails
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Static directory with an index page and one script
pub fn create_static_dir() -> TempDir {
    let dir = create_temp_dir();
    std::fs::write(
        dir.path().join("index.html"),
        "<!doctype html><h2>TextGen-RAG Demo</h2>",
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), "console.log('ready')").unwrap();
    dir
}

pub fn create_host_config(static_dir: &Path) -> HostConfig {
    HostConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: static_dir.to_path_buf(),
        body_limit: 64,
        ..HostConfig::default()
    }
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
client:
  base_url: "http://backend.test:8000"
  api_key: "yaml-key"
host:
  host: "127.0.0.1"
  port: 3100
  static_dir: "dist"
  logs:
    level: "debug"
"#;
