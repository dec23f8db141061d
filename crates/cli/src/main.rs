use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use propensity_core::{decide, Decision, SurveyAnswers};
use propensity_import::{build_feature_table, labelled, write_features, ExchangeRateClient, PipelineConfig, API_KEY_ENV};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "propensity", version, about = "Build propensity-model feature tables")]
struct Cli {
    /// Pipeline configuration file.
    #[arg(short, long, default_value = "propensity.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import, link and export the campaign/mortgage feature table.
    Features {
        /// Write CSV here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep only rows whose created_account is known.
        #[arg(long)]
        labelled_only: bool,
    },
    /// Turn one respondent's survey answers (JSON) into a feature row.
    Respondent {
        answers: PathBuf,
        /// Model probability to compare against the configured threshold.
        #[arg(long)]
        probability: Option<f64>,
        /// Reference date for time with employer; defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the exported table
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    match cli.command {
        Command::Features {
            output,
            labelled_only,
        } => run_features(&config, output, labelled_only).await,
        Command::Respondent {
            answers,
            probability,
            today,
        } => run_respondent(&config, answers, probability, today),
    }
}

async fn run_features(
    config: &PipelineConfig,
    output: Option<PathBuf>,
    labelled_only: bool,
) -> Result<()> {
    let rows = if config.rates.fixed.is_empty() {
        let api_key = config
            .rates
            .api_key()
            .with_context(|| format!("no exchange-rate API key; set rates.api_key or {API_KEY_ENV}"))?;
        let client = ExchangeRateClient::new(&config.rates.base_url, api_key);
        build_feature_table(config, &client).await
    } else {
        tracing::info!("using fixed exchange rates from config");
        build_feature_table(config, &config.rates.fixed).await
    }
    .context("building feature table")?;

    let rows = if labelled_only { labelled(rows) } else { rows };

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            write_features(&rows, BufWriter::new(file))?;
            tracing::info!(rows = rows.len(), path = %path.display(), "wrote feature table");
        }
        None => write_features(&rows, io::stdout().lock())?,
    }
    Ok(())
}

fn run_respondent(
    config: &PipelineConfig,
    answers: PathBuf,
    probability: Option<f64>,
    today: Option<NaiveDate>,
) -> Result<()> {
    let text = std::fs::read_to_string(&answers)
        .with_context(|| format!("reading {}", answers.display()))?;
    let answers: SurveyAnswers = serde_json::from_str(&text).context("parsing survey answers")?;

    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let row = answers.to_feature_row(&config.survey.lookups, today)?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &row)?;
    writeln!(out)?;

    if let Some(p) = probability {
        let threshold = config.survey.threshold;
        match decide(p, threshold) {
            Decision::Offer => writeln!(out, "offer: probability {p:.2} above threshold {threshold:.2}")?,
            Decision::NoOffer => writeln!(out, "no offer: probability {p:.2} at or below threshold {threshold:.2}")?,
        }
    }
    Ok(())
}
