//! `evidence-validator`: stdio MCP server and one-shot evidence checks.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evidence_core::{
    check_evidence_required, evaluate_claim, tool_descriptors, ClaimInput, RequestContext,
};
use evidence_mcp::{serve_stdio, EvidenceServer, ServerConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "evidence-validator",
    version,
    about = "Context-aware evidence validation for claims, served over MCP stdio"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty, help = "Log output format (stderr)")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Serve the MCP tools over stdio (default)")]
    Serve {
        #[arg(short, long, help = "Server configuration file (YAML)")]
        config: Option<PathBuf>,
    },

    #[command(about = "Check whether a user request calls for evidence")]
    Check {
        #[arg(help = "The user's request or question")]
        request: String,
    },

    #[command(about = "Validate a claim against its context")]
    Validate {
        #[arg(long, help = "evaluation, status, verification or normal_task; other values need no evidence")]
        context: RequestContext,

        #[arg(long, help = "The claim being made")]
        claim: String,

        #[arg(long, help = "Evidence supporting the claim (command + output + timestamp)")]
        evidence: Option<String>,

        #[arg(long = "trigger", help = "User phrase that triggered the evidence requirement")]
        triggers: Vec<String>,

        #[arg(long, help = "Print a JSON record instead of the verdict text")]
        json: bool,
    },

    #[command(about = "Print the registered tool descriptors")]
    Tools,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(verbose: bool, format: LogFormat) {
    let default_filter = if verbose { "evidence=debug" } else { "evidence=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => {
            let config = match config {
                Some(path) => ServerConfig::from_yaml_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => ServerConfig::default(),
            };
            tracing::debug!(config = ?config, "Server configuration loaded");
            let server = EvidenceServer::new(config);
            serve_stdio(&server)
                .await
                .context("MCP server stopped with an error")?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { request } => {
            let report = check_evidence_required(&request);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate {
            context,
            claim,
            evidence,
            triggers,
            json,
        } => {
            let mut input = ClaimInput::new(context, claim).with_trigger_phrases(triggers);
            input.evidence = evidence;

            let assessment = evaluate_claim(&input);
            if json {
                let record = json!({
                    "verdict": assessment.verdict.kind(),
                    "passed": assessment.passed(),
                    "message": assessment.verdict.message(),
                    "evaluated_at": assessment.evaluated_at.to_rfc3339(),
                });
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", assessment.verdict);
            }

            Ok(if assessment.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Tools => {
            let listing = json!({ "tools": tool_descriptors() });
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
