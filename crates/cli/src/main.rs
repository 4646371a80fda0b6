use clap::Parser;
use dps_domain::{CliOverrides, Config};
use dps_jobs::{CacheSweepJob, JobRunner};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dns-proxy-server")]
#[command(version)]
#[command(about = "DNS proxy with local records, response caching and upstream failover")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting DNS Proxy Server v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().or_else(Config::get_config_path);
    let config_arc = Arc::new(RwLock::new(config.clone()));
    let services = di::DnsServices::new(&config, config_arc)?;

    let shutdown = CancellationToken::new();

    let sweep_job = CacheSweepJob::new(services.cache_maintenance.clone())
        .with_interval(config.cache.sweep_interval());
    let job_handles = JobRunner::new()
        .with_cache_sweep(sweep_job)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let handler = services.handler.clone();
    let server_shutdown = shutdown.clone();
    let server_task = tokio::spawn(async move {
        if let Err(e) = server::start_dns_server(dns_addr, handler, server_shutdown).await {
            error!(error = %e, "DNS server error");
        }
    });

    bootstrap::wait_for_signals(&services, config_path.as_deref(), &shutdown).await;

    shutdown.cancel();
    let _ = server_task.await;
    for handle in job_handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Background job ended abnormally");
        }
    }

    let stats = services.handler.use_case().stats();
    let cache = services.cache.metrics_snapshot();
    info!(
        queries = stats.total,
        from_static = stats.from_static,
        from_cache = stats.from_cache,
        from_upstream = stats.from_upstream,
        no_such_name = stats.no_such_name,
        failed = stats.failed,
        cache_entries = cache.entries,
        cache_hit_rate = cache.hit_rate,
        static_records = services.records.len(),
        inflight = services.solver.inflight_count(),
        "Server shutdown complete"
    );
    Ok(())
}
