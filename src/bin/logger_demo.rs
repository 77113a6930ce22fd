use larder::logger::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    // $ RUST_LOG=trace cargo run --bin logger_demo
    let config = LogConfig {
        filter: "larder=debug".to_string(),
    };
    logger.reload_from_config(&config)?;
    trace!(target: "larder", "application trace log");
    debug!(target: "larder", "application debug log");
    info!(target: "larder", "application info log");
    warn!(target: "other", "filtered unless it is a warning");

    Ok(())
}
