//! `rotating-cookies` - Signed cookie demo server and secret tooling.
//!
//! Initializes the application runtime, loads configuration, sets up logging,
//! and serves the demo routes. `generate-secret [32|64]` prints a fresh
//! base64 secret instead.

use rotating_cookies::{Config, CookieManager, Secret, SecretStrength, serve};

use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("generate-secret") {
        return generate_secret(args.next().as_deref());
    }

    dotenvy::dotenv().ok();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let manager = match CookieManager::new(&config.cookie) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            error!(error = %e, "Failed to build cookie manager");
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(listen_addr = %config.listen_addr, error = %e, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    info!(
        listen_addr = %config.listen_addr,
        path = %manager.path(),
        same_site = %manager.same_site(),
        current_strength = ?manager.current_strength(),
        previous_strength = ?manager.previous_strength(),
        log_format = %config.log_format,
        "Server initialized"
    );

    serve(listener, manager).await;
    ExitCode::SUCCESS
}

fn generate_secret(size: Option<&str>) -> ExitCode {
    let strength = match size {
        None | Some("64") => SecretStrength::SignedEncrypted,
        Some("32") => SecretStrength::Signed,
        Some(other) => {
            eprintln!("unsupported secret size {other:?}, expected 32 or 64");
            return ExitCode::FAILURE;
        }
    };
    println!("{}", Secret::generate(strength).to_base64());
    ExitCode::SUCCESS
}
