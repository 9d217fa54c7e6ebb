//! Cart Rules CLI - run checkout functions and check merchant configuration.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate the quantity-limit validator on a host payload
//! cart-rules run cart-validation --input payload.json
//!
//! # Same, reading the payload from stdin
//! cat payload.json | cart-rules run cart-validation --pretty
//!
//! # Validate a configuration value before saving it to the metafield
//! cart-rules check-config cart-validation --config limits.json
//! ```
//!
//! # Commands
//!
//! - `run` - Evaluate a function; output JSON goes to stdout
//! - `check-config` - Validate a configuration value; one line per rule

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use cart_rules_functions::FunctionKind;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "cart-rules")]
#[command(author, version, about = "Cart Rules checkout function tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a function on a host payload
    Run {
        /// Function to run
        function: FunctionArg,

        /// Payload file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Indent the output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a merchant configuration value
    CheckConfig {
        /// Function the configuration belongs to
        function: FunctionArg,

        /// Configuration file (reads stdin when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FunctionArg {
    /// Quantity limits per collection
    CartValidation,
    /// Subtotal tiers unlocking a per-product discount
    TieredDiscount,
    /// Percentage off a collection above a cart total
    CollectionDiscount,
    /// Hide cash on delivery for untagged customers
    PaymentCustomization,
}

impl From<FunctionArg> for FunctionKind {
    fn from(arg: FunctionArg) -> Self {
        match arg {
            FunctionArg::CartValidation => Self::CartValidation,
            FunctionArg::TieredDiscount => Self::TieredDiscount,
            FunctionArg::CollectionDiscount => Self::CollectionDiscount,
            FunctionArg::PaymentCustomization => Self::PaymentCustomization,
        }
    }
}

/// Initialize tracing on stderr; stdout is reserved for command output.
fn init_tracing(log_format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_rules=info".into());

    let is_json = log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Tracing needs the log format, so a bad config is reported in text
    let config = CliConfig::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::Text, |c| c.log_format));

    let result: Result<(), Box<dyn std::error::Error>> = config
        .map_err(Into::into)
        .and_then(|config| run(cli, &config));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            function,
            input,
            pretty,
        } => commands::run::execute(
            function.into(),
            input.as_deref(),
            pretty,
            config.function_settings(),
        )?,
        Commands::CheckConfig { function, config } => {
            commands::check_config::execute(function.into(), config.as_deref())?;
        }
    }
    Ok(())
}
