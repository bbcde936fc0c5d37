//! archverify command-line interface.
//!
//! Reports go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use archverify_core::{ArtifactKind, Artifacts, Profile};
use archverify_runtime::{Pipeline, PipelineError, RuntimeConfig};

#[derive(Parser)]
#[command(name = "archverify")]
#[command(about = "Verify OpenAPI, BPMN and PlantUML architecture artifacts")]
#[command(version)]
struct Cli {
    /// Runtime configuration file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze artifacts and print the aggregated report
    Analyze {
        /// OpenAPI specification (JSON)
        openapi: Option<PathBuf>,

        /// BPMN model (XML)
        bpmn: Option<PathBuf>,

        /// PlantUML diagram
        puml: Option<PathBuf>,

        /// Override the configured analysis profile
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
    },

    /// Analyze a single artifact and print its result
    Check {
        /// Artifact kind: openapi, bpmn or puml
        #[arg(long)]
        kind: ArtifactKind,

        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Joint,
    Split,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Joint => Profile::Joint,
            ProfileArg::Split => Profile::Split,
        }
    }
}

/// Payload printed when no OpenAPI artifact is given.
#[derive(Debug, Serialize)]
struct MisusePayload {
    errors: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
    cross_consistency_issues: Vec<String>,
}

impl MisusePayload {
    fn missing_openapi() -> Self {
        Self {
            errors: vec!["OpenAPI artifact not provided".to_string()],
            warnings: Vec::new(),
            suggestions: Vec::new(),
            cross_consistency_issues: Vec::new(),
        }
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Reported,
    Misuse,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Reported => ExitCode::SUCCESS,
            Outcome::Misuse => ExitCode::FAILURE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(cli).await.map(ExitCode::from)
}

/// Caller misuse is answered before any configuration is loaded.
async fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Commands::Analyze {
            openapi,
            bpmn,
            puml,
            profile,
        } => {
            let Some(openapi) = openapi else {
                print_json(&MisusePayload::missing_openapi())?;
                return Ok(Outcome::Misuse);
            };

            let pipeline = build_pipeline(cli.config.as_deref())?;
            let artifacts = Artifacts {
                openapi: Some(read_artifact(&openapi)?),
                bpmn: bpmn.as_deref().map(read_artifact).transpose()?,
                puml: puml.as_deref().map(read_artifact).transpose()?,
            };
            let profile = profile.map(Profile::from).unwrap_or(pipeline.profile());

            match pipeline.analyze_with_profile(&artifacts, profile).await {
                Ok(report) => print_json(&report)?,
                Err(PipelineError::MissingArtifact(_)) => {
                    print_json(&MisusePayload::missing_openapi())?;
                    return Ok(Outcome::Misuse);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Check { kind, file } => {
            let pipeline = build_pipeline(cli.config.as_deref())?;
            let content = read_artifact(&file)?;
            let result = pipeline.check(kind, &content).await;
            print_json(&result)?;
        }
    }

    Ok(Outcome::Reported)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_pipeline(config_path: Option<&Path>) -> Result<Pipeline> {
    let config = match config_path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    }
    .with_env_overrides();

    let pipeline = Pipeline::builder()
        .config(config)
        .build()
        .context("failed to build verification pipeline")?;

    tracing::debug!(backend = pipeline.backend(), profile = %pipeline.profile(), "Pipeline ready");
    Ok(pipeline)
}

fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
