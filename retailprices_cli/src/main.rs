mod output;
mod query;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use retailprices_lib::{Client, PageFetcher, DEFAULT_ENDPOINT};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

const CRATE_TARGETS: &[&str] = &["retailprices_api", "retailprices_lib", "retailprices_cli"];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    None,
}

impl LogLevel {
    fn as_directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
            LogLevel::None => None,
        }
    }
}

#[derive(Parser)]
#[command(name = "azure-prices", version)]
#[command(about = "Query the Azure Retail Prices API and print matching prices")]
struct Cli {
    #[command(flatten)]
    query: query::QueryArgs,

    /// Output format
    #[arg(long, alias = "output", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Prices API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT, env = "AZURE_PRICES_ENDPOINT")]
    endpoint: String,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Prefix log lines with their level
    #[arg(long)]
    prefix: bool,
}

fn init_logging(level: LogLevel, prefix: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => {
            let Some(level) = level.as_directive() else {
                return Ok(());
            };
            let mut filter = EnvFilter::new("warn");
            for target in CRATE_TARGETS {
                filter = filter.add_directive(format!("{}={}", target, level).parse()?);
            }
            filter
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(prefix)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.prefix)?;

    let client = Client::with_endpoint(&cli.endpoint)?;
    let fetcher = PageFetcher::new(client);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tracing::debug!("Querying {}", fetcher.client().endpoint());
    query::run(&cli.query, &fetcher, cli.format, &mut out).await?;
    tracing::debug!("Finished.");
    Ok(())
}
