use std::net::TcpListener;

use wiremock::MockServer;

/// Mock server for in-crate tests, or `None` when localhost cannot be bound.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_err() {
        eprintln!("[socket-bound-test] cannot bind localhost; skipping");
        return None;
    }
    Some(MockServer::start().await)
}
