//! Compliance CLI
//!
//! Operator tooling over the compliance core:
//! - Validate form snapshots and run them through the submission controller
//! - Score passwords against the configured policy
//! - Build consent records from the configured catalog
//! - Evaluate the destructive-action confirmation gate
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::check::FormName;
use commands::consent::Bulk;
use commands::gate::GateArg;
use commands::{check, consent, gate, strength, submit, CommandOutput};
use config::{ComplianceConfig, LoggingConfig};

#[derive(Parser)]
#[command(name = "compliance")]
#[command(about = "Compliance core: form validation, consent and confirmation", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "COMPLIANCE_CONFIG", global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON snapshot of a form
    Check {
        #[arg(value_enum)]
        form: FormName,

        /// JSON object of field name to value
        #[arg(long)]
        values: PathBuf,
    },

    /// Validate and submit a snapshot, writing the payload as a JSON line
    Submit {
        #[arg(value_enum)]
        form: FormName,

        #[arg(long)]
        values: PathBuf,

        /// Append the payload here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a password
    Strength { password: String },

    /// Build a consent record
    Consent(ConsentArgs),

    /// Evaluate the confirmation gate
    Gate(GateArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
struct ConsentArgs {
    /// Grant every optional category
    #[arg(long, conflicts_with = "reject_all")]
    accept_all: bool,

    /// Withdraw every optional category
    #[arg(long)]
    reject_all: bool,

    /// Grant a category (repeatable)
    #[arg(long = "grant", value_name = "ID")]
    grants: Vec<String>,

    /// Withdraw a category (repeatable)
    #[arg(long = "withdraw", value_name = "ID")]
    withdrawals: Vec<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct GateArgs {
    /// Text typed into the confirmation box
    #[arg(long)]
    typed: Option<String>,

    /// Acknowledgement checkbox ticked
    #[arg(long)]
    acknowledged: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ComplianceConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.verbose);

    let output = match cli.command {
        Commands::Check { form, values } => check::execute(form, &values, &config)?,
        Commands::Submit {
            form,
            values,
            output,
        } => submit::execute(form, &values, output, &config).await?,
        Commands::Strength { password } => strength::execute(&password, &config.password)?,
        Commands::Consent(args) => {
            let bulk = if args.accept_all {
                Some(Bulk::AcceptAll)
            } else if args.reject_all {
                Some(Bulk::RejectAll)
            } else {
                None
            };
            consent::execute(&config.consent, bulk, &args.grants, &args.withdrawals)?
        }
        Commands::Gate(args) => {
            let input = match args.typed {
                Some(text) => GateArg::Typed(text),
                None => GateArg::Acknowledged,
            };
            gate::execute(&config.confirmation, input)?
        }
        Commands::Config => CommandOutput::ok(serde_json::to_value(&config)?),
    };

    if let Some(body) = &output.body {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
