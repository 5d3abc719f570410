//! Skips wiremock-backed tests where localhost sockets cannot be bound.
//!
//! Set `HARVESTER_REQUIRE_SOCKET_TESTS=1` to turn a skip into a failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "HARVESTER_REQUIRE_SOCKET_TESTS";

fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock server, or returns `None` after logging why the calling
/// test is skipped.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl std::future::Future<Output = Option<MockServer>> {
    let location = Location::caller();
    let bindable = TcpListener::bind("127.0.0.1:0").is_ok();

    if !bindable {
        let message = format!(
            "[socket-bound-test] {}:{} needs a localhost socket",
            location.file(),
            location.line()
        );
        assert!(!socket_tests_required(), "{message}; {REQUIRE_ENV} is set");
        eprintln!("{message}; skipping. Set {REQUIRE_ENV}=1 to fail instead.");
    }

    async move {
        if bindable {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
