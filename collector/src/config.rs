use anyhow::{Context, Result};
use std::time::Duration;
use structopt::StructOpt;

use collector_core::OutputFormat;

#[derive(Debug)]
pub struct Config {
    /// Enables verbose logging to stderr
    pub debug: bool,

    /// If set, scrape this exporter instead of querying the Prometheus api.
    /// e.g. "http://localhost:9100/metrics"
    pub exporter_url: Option<String>,

    /// The base url of the Prometheus api.
    pub prom_url: String,

    /// The instant query to evaluate against the Prometheus api.
    pub prom_query: String,

    /// How the collected samples are written to stdout.
    pub output_format: OutputFormat,

    /// Prepended to metric names by the line protocol formats.
    pub metric_prefix: String,

    /// A comma separated list of metric name prefixes to keep.
    pub metric_include: String,

    /// A comma separated list of metric name prefixes to drop.
    pub metric_exclude: String,

    /// How long to wait for the exporter or Prometheus to respond.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from arguments, env and dotenv
    pub fn load() -> Result<Config> {
        // Attempts to find a `.env` file to initialize/extend the environment
        dotenv::dotenv().ok();

        // Load the config from arguments, then environment variables
        let env = Environment::from_args();
        let mut config = Config::from(env);
        if let Ok(val) = dotenv::var("DEBUG") {
            config.debug |= parse_toggle(&val).context("invalid DEBUG")?;
        }
        Ok(config)
    }
}

impl From<Environment> for Config {
    fn from(env: Environment) -> Self {
        Config {
            debug: env.debug,
            exporter_url: env.exporter_url.filter(|url| !url.is_empty()),
            prom_url: env.prom_url,
            prom_query: env.prom_query,
            output_format: env.output_format,
            metric_prefix: env.metric_prefix,
            metric_include: env.metric_include,
            metric_exclude: env.metric_exclude,
            timeout: match env.timeout {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "prometheus-collector")]
struct Environment {
    /// Enables verbose logging to stderr
    #[structopt(short, long)]
    debug: bool,

    /// Prometheus exporter URL to pull metrics from
    #[structopt(long, env = "EXPORTER_URL")]
    exporter_url: Option<String>,

    /// Prometheus API URL
    #[structopt(long, env = "PROM_URL", default_value = "http://localhost:9090")]
    prom_url: String,

    /// Prometheus API query string
    #[structopt(long, env = "PROM_QUERY", default_value = "up")]
    prom_query: String,

    /// The output format to use for metrics {influx|graphite|json}
    #[structopt(long, env = "OUTPUT_FORMAT", default_value = "influx")]
    output_format: OutputFormat,

    /// Metric name prefix, only supported by line protocol output formats
    #[structopt(long, env = "METRIC_PREFIX", default_value = "")]
    metric_prefix: String,

    /// A comma separated list of metric name prefixes to include
    #[structopt(long, env = "METRIC_INCLUDE", default_value = "")]
    metric_include: String,

    /// A comma separated list of metric name prefixes to exclude
    #[structopt(long, env = "METRIC_EXCLUDE", default_value = "")]
    metric_exclude: String,

    /// How long (in seconds) to wait for a response, 0 to wait forever
    #[structopt(long, env = "SOURCE_TIMEOUT", default_value = "10")]
    timeout: u64,
}

fn parse_toggle(val: &str) -> Result<bool> {
    match val {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        _ => Ok(val.parse::<bool>()?),
    }
}
