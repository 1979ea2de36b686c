//! Prometheus Collector
//!
//! Collects a snapshot of metrics from a Prometheus server or exporter,
//! and prints it to stdout as json, graphite or influx line protocol.

mod config;

use anyhow::{Context, Result}; // alias std::result::Result with dynamic error type
use tracing_subscriber::EnvFilter;

use collector_core::source::{ExporterScrape, PrometheusQuery, Source};
use collector_core::Pipeline;

use crate::config::Config;

/// The exit status used when metrics couldn't be collected or written.
const EXIT_FAILURE: i32 = 2;

/// The program's main entry point.
fn main() {
    if let Err(err) = try_main() {
        eprintln!("Error: {}", err);
        for err in err.chain().skip(1) {
            eprintln!("Caused by: {}", err);
        }
        std::process::exit(EXIT_FAILURE);
    }
}

fn try_main() -> Result<()> {
    let config = Config::load()?;
    init_logging(config.debug);
    tracing::debug!(?config, "loaded configuration");

    async_std::task::block_on(run(config))
}

/// Logs go to stderr; stdout is reserved for the metrics payload.
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "warn,collector_core=debug,prometheus_collector=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

/// Collect a sample set once, then encode it to stdout
async fn run(config: Config) -> Result<()> {
    let source: Box<dyn Source> = match &config.exporter_url {
        Some(url) => Box::new(
            ExporterScrape::new(url)
                .context("configuring exporter")?
                .with_timeout(config.timeout),
        ),
        None => Box::new(
            PrometheusQuery::new(&config.prom_url, config.prom_query.as_str())
                .context("configuring prometheus query")?
                .with_timeout(config.timeout),
        ),
    };
    let samples = source.fetch().await.context("collecting metrics")?;
    tracing::debug!(series = samples.len(), "collected metrics");

    let pipeline = Pipeline::new(
        config.output_format,
        &config.metric_prefix,
        &config.metric_include,
        &config.metric_exclude,
    );
    let stdout = std::io::stdout();
    pipeline
        .write_to(&samples, stdout.lock())
        .context("writing metrics")?;

    Ok(())
}
