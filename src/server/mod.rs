// Server module entry point
// Reference host: accept loop, connection handling and shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::handler::StaticHandler;
use crate::logger;

pub use connection::{handle_connection, route};
pub use listener::create_listener;
pub use signal::shutdown_signal;

/// Shared, read-only state handed to every connection
pub struct ServerState<F> {
    pub handler: StaticHandler<F>,
    pub access_log: bool,
    pub keep_alive: bool,
    pub timeout: Duration,
}

impl<F> ServerState<F> {
    pub fn new(handler: StaticHandler<F>, cfg: &Config) -> Self {
        Self {
            handler,
            access_log: cfg.logging.access_log,
            keep_alive: cfg.performance.keep_alive,
            timeout: Duration::from_secs(cfg.performance.timeout_secs),
        }
    }
}

/// Accept connections until `shutdown` resolves.
///
/// Connections already spawned keep running until they finish or time out.
pub async fn run<F, S>(listener: TcpListener, state: Arc<ServerState<F>>, shutdown: S)
where
    F: FileSystem + 'static,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            logger::log_debug(&format!("Failed to set TCP_NODELAY: {e}"));
                        }
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => {
                tracing::info!("Stopped accepting connections");
                break;
            }
        }
    }
}
