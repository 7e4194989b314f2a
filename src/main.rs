use anyhow::Context;
use clap::Parser;
use passport_attest::io::{read_addresses_file, write_report_file};
use passport_attest::orchestration::{Pipeline, PipelineSettings};
use passport_attest::{Config, EasSubmitter, RunSummary, ScoreSource, ScorerApiClient, Submitter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "passport-attest", about = "Push scorer results on-chain as attestations")]
struct Args {
    /// Newline-delimited list of addresses to attest.
    #[arg(long)]
    input: PathBuf,
    /// CSV report destination.
    #[arg(long, default_value = "attestation_results.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let addresses = read_addresses_file(&args.input)?;
    tracing::info!(count = addresses.len(), input = %args.input.display(), "Loaded addresses");

    let scorer: Arc<dyn ScoreSource> = Arc::new(
        ScorerApiClient::new(
            config.scorer_api_url.clone(),
            config.scorer_api_key.clone(),
            config.http_timeout,
        )
        .context("failed building scoring-service client")?,
    );
    let submitter: Arc<dyn Submitter> = Arc::new(
        EasSubmitter::connect(
            &config.rpc_url,
            &config.private_key,
            config.attester_address,
            config.chain_id,
        )
        .await
        .context("failed connecting attestation submitter")?,
    );

    let pipeline = Pipeline::new(scorer, submitter, PipelineSettings::from(&config));
    let outcomes = pipeline.run(&addresses).await;

    write_report_file(&args.output, &outcomes)
        .with_context(|| format!("failed writing report: {}", args.output.display()))?;

    let summary = RunSummary::from_outcomes(&outcomes);
    tracing::info!(
        output = %args.output.display(),
        rows = summary.total(),
        succeeded = summary.succeeded,
        zero_score = summary.zero_score,
        failed = summary.failed,
        "Report written"
    );
    Ok(())
}
