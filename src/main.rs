use larder::api;
use larder::app::*;
use larder::application_port::RouteGuard;
use larder::logger::*;
use larder::settings::*;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    match cli.command {
        Command::Serve => serve(&project_settings).await,
        command => {
            let app = App::try_new(&project_settings).await?;
            let result = run(&app, command).await;
            app.shutdown().await?;
            match result {
                Ok(()) => Ok(()),
                Err(e) if e.requires_login() => {
                    debug!(error = %e, "command needs a session");
                    Err(anyhow::anyhow!("{} Run `larder login`.", e.user_message()))
                }
                Err(e) => {
                    debug!(error = ?e, "command failed");
                    Err(anyhow::anyhow!(e.user_message()))
                }
            }
        }
    }
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let address: SocketAddr = settings.edge.address.parse()?;
    let static_dir = PathBuf::from(&settings.edge.static_dir);
    if !fs::metadata(&static_dir)?.is_dir() {
        return Err(anyhow::anyhow!(
            "static dir is not a directory: {:?}",
            static_dir
        ));
    }

    let guard: Arc<dyn RouteGuard> = Arc::new(api::edge::RefreshingRouteGuard::new(
        settings.api.base_url.clone(),
        settings.api.timeout_secs.map(Duration::from_secs),
    ));
    let routes = api::edge::routes(guard, static_dir, settings.edge.secure_cookies)
        .recover(api::edge::recover_error)
        .with(warp::trace::request());

    match (&settings.edge.cert_path, &settings.edge.key_path) {
        (Some(cert_path), Some(key_path)) => {
            for path in [cert_path, key_path] {
                if !fs::metadata(path)?.is_file() {
                    return Err(anyhow::anyhow!("TLS file is not a regular file: {:?}", path));
                }
            }
            info!(%address, "edge listening with TLS");
            warp::serve(routes)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .bind_with_graceful_shutdown(address, shutdown_signal())
                .1
                .await;
        }
        (None, None) => {
            let (bound, server) =
                warp::serve(routes).try_bind_with_graceful_shutdown(address, shutdown_signal())?;
            info!(address = %bound, "edge listening");
            server.await;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "edge.cert_path and edge.key_path must be set together"
            ));
        }
    }

    info!("edge shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "could not listen for SIGINT");
    }
}
