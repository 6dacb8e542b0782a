use std::sync::Arc;

use spa_static::config::Config;
use spa_static::server::{self, ServerState};
use spa_static::{logger, DirFs, StaticHandler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging.level);

    // Build the Tokio runtime, sizing the worker pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("Using {workers} worker threads");
    } else {
        tracing::info!("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let root = DirFs::new(&cfg.static_files.root).map_err(|e| {
        logger::log_error(&format!(
            "Cannot serve from '{}': {e}",
            cfg.static_files.root
        ));
        e
    })?;
    let root_dir = root.root().display().to_string();
    let handler = StaticHandler::new(root, cfg.static_options()?).await?;

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &root_dir, cfg.static_files.dynamic);

    let state = Arc::new(ServerState::new(handler, &cfg));
    server::run(listener, state, server::shutdown_signal()).await;
    Ok(())
}
