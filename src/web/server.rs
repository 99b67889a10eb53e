//! HTTP/1 accept loop.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use super::routes::route;
use crate::core::manager::CookieManager;

/// Serves the demo routes on `listener` until the task is dropped.
///
/// Every connection runs on its own task and shares the manager read-only.
pub async fn serve(listener: TcpListener, manager: Arc<CookieManager>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let manager = Arc::clone(&manager);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let response = route(&manager, &req);
                async move { Ok::<_, Infallible>(response) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(peer = %peer, error = %e, "Connection closed with error");
            }
        });
    }
}
