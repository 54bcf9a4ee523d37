use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use polex_client::{ApiClient, ClientConfig, DEFAULT_CONFIG_FILE};
use polex_report::{export, ReportStore};

#[derive(Parser)]
#[command(name = "polex")]
#[command(about = "Export DAM appliance policy rules as a CSV report")]
#[command(version)]
struct Cli {
    /// Config file (JSON) path. Uses polex.json in the working directory if omitted
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Appliance admin user name
    #[arg(short, long)]
    username: String,

    /// Appliance admin user password
    #[arg(short = 'w', long)]
    password: String,

    /// Output file name. Writes to stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // CSV may go to stdout, so all diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ClientConfig::from_file(&config_path)
        .with_context(|| format!("failed to load parameters from {}", config_path.display()))?;

    let mut client = ApiClient::connect(&config)?;
    client
        .authenticate(&cli.username, &cli.password)
        .await
        .with_context(|| format!("authentication against {} failed", config.base_url()))?;

    let mut store = ReportStore::new();

    let policies = client
        .fetch_policies()
        .await
        .context("failed to fetch policy list")?;
    tracing::info!("loaded {} policies", policies.len());
    store.add_policies(policies);

    // One rule fetch per policy, strictly sequential; any failure aborts the
    // run before anything is written.
    for description in store.policy_descriptions() {
        let detail = client
            .fetch_policy_rules(&description)
            .await
            .with_context(|| format!("failed to fetch rules for policy '{}'", description))?;
        store.add_policy_detail(&detail);
    }
    tracing::info!("flattened {} rule records", store.rule_count());

    let rows = store.joined_rows();

    match cli.output {
        Some(path) => {
            // A local write failure is reported but does not fail the run
            if let Err(e) = export::write_report_file(&path, &rows) {
                eprintln!("failed to write {}: {}", path.display(), e);
            } else {
                eprintln!("wrote {} rows to {}", rows.len(), path.display());
            }
        }
        None => {
            export::write_report(std::io::stdout().lock(), &rows, false)?;
        }
    }

    Ok(())
}
