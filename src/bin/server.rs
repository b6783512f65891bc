//! casegate REST server
//!
//! Run with: cargo run --features server --bin casegate-server
//!
//! Endpoints:
//!   GET  /health              - Health check
//!   POST /session/login       - Log in through the auth API
//!   GET  /session/verify      - Re-validate a bearer token
//!   POST /session/logout      - End a session
//!   GET  /session/check       - Check ?permission= and ?role=
//!   GET  /catalog/permissions - Every catalogued permission
//!   GET  /catalog/bundles     - Permission bundles
//!   GET  /catalog/read-only   - Observation-only permissions

use std::sync::Arc;

use casegate::server::{router, AppState};
use casegate::{telemetry, Command, Config, HttpAuthBackend};

fn usage() {
    println!("casegate-server - session authorization front for the fraud-case dashboard\n");
    println!("USAGE:");
    println!("    casegate-server [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    -a, --auth-url <URL>  Base URL of the auth API (env: CASEGATE_AUTH_URL)");
    println!("    -p, --port <PORT>     Listen on PORT (env: CASEGATE_BIND, default 3000)");
    println!("    -h, --help            Show this help message");
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env().and_then(|c| c.apply_args(std::env::args().skip(1))) {
        Ok(Command::Run(c)) => c,
        Ok(Command::Help) => {
            usage();
            return;
        }
        Err(e) => {
            eprintln!("{e}\n");
            usage();
            std::process::exit(2);
        }
    };

    telemetry::init_tracing(&config.log);

    let backend = match HttpAuthBackend::from_config(&config) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "cannot create auth client");
            std::process::exit(2);
        }
    };
    tracing::info!(auth_url = backend.base_url(), "using auth api");

    let app = router(AppState::new(Arc::new(backend)));

    let listener = match tokio::net::TcpListener::bind(&config.bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(bind = %config.bind, error = %e, "bind failed");
            std::process::exit(1);
        }
    };
    tracing::info!(bind = %config.bind, version = env!("CARGO_PKG_VERSION"), "casegate-server listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
