use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use interview_eval::{
    config::AppConfig,
    models::{
        state::SubmissionState,
        submission::{ResumeFile, SubmissionInput},
    },
    services::{
        controller::{self, SubmissionController},
        encoder::NamingScheme,
    },
};
use tracing_subscriber::EnvFilter;

/// Submit a résumé, job description and mock interview answer for evaluation.
///
/// Prints the normalized report as JSON on stdout. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "interview-eval", version)]
struct Cli {
    /// Résumé file (.pdf, .doc, .docx or .txt)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job description text
    #[arg(long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// File containing the job description
    #[arg(long)]
    job_description_file: Option<PathBuf>,

    /// Mock interview response text
    #[arg(long, conflicts_with = "response_file")]
    response: Option<String>,

    /// File containing the mock interview response
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Field naming scheme: "combined" or "interview"
    #[arg(long)]
    scheme: Option<NamingScheme>,

    /// Evaluation service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "interview-eval failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load configuration; command-line flags win over the environment
    let mut config = AppConfig::from_env()?;
    if let Some(scheme) = cli.scheme {
        config.naming_scheme = scheme;
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    let config = config.checked()?;

    controller::describe_metrics();

    tracing::info!(
        base_url = %config.base_url,
        scheme = %config.naming_scheme,
        timeout_secs = config.timeout_secs,
        "Initializing evaluation client"
    );

    let input = read_input(&cli).await?;
    let controller = SubmissionController::from_config(&config)?;

    controller.submit(input)?;

    match controller.wait_until_settled().await {
        SubmissionState::Success { report, .. } => {
            let document = report.to_document()?;
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(ExitCode::SUCCESS)
        }
        SubmissionState::Failed { error, .. } => {
            tracing::error!(error = %error, "Evaluation failed");
            Ok(ExitCode::FAILURE)
        }
        other => {
            tracing::error!(status = %other.status(), "Submission ended without an outcome");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Gather inputs as given; completeness is left to the validator.
async fn read_input(cli: &Cli) -> Result<SubmissionInput, Box<dyn std::error::Error>> {
    let resume_file = match &cli.resume {
        Some(path) => Some(ResumeFile::from_path(path).await?),
        None => None,
    };

    let job_description =
        text_or_file(cli.job_description.as_deref(), cli.job_description_file.as_deref()).await?;
    let candidate_response =
        text_or_file(cli.response.as_deref(), cli.response_file.as_deref()).await?;

    Ok(SubmissionInput::new(
        resume_file,
        job_description,
        candidate_response,
    ))
}

async fn text_or_file(text: Option<&str>, file: Option<&Path>) -> std::io::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => tokio::fs::read_to_string(path).await,
        (None, None) => Ok(String::new()),
    }
}
