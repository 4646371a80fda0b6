use crate::di::DnsServices;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Blocks until ctrl-c or until `shutdown` is cancelled elsewhere. SIGHUP
/// reloads the configuration file in place.
pub async fn wait_for_signals(
    services: &DnsServices,
    config_path: Option<&str>,
    shutdown: &CancellationToken,
) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!(error = %e, "SIGHUP handler unavailable, reload disabled");
                None
            }
        };

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!(error = %e, "Failed to listen for ctrl-c");
                    }
                    info!("Shutdown signal received");
                    return;
                }
                Some(_) = async {
                    match hangup.as_mut() {
                        Some(stream) => stream.recv().await,
                        None => std::future::pending().await,
                    }
                } => {
                    reload(services, config_path).await;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (services, config_path);
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
        }
    }
}

#[cfg(unix)]
async fn reload(services: &DnsServices, config_path: Option<&str>) {
    let Some(path) = config_path else {
        warn!("SIGHUP received but no configuration file is in use");
        return;
    };

    info!(path, "SIGHUP received, reloading configuration");
    if let Err(e) = services.reload_config.execute(path).await {
        error!(error = %e, "Configuration reload failed, keeping current settings");
    }
}
