mod commands;
mod output;

use clap::{Parser, Subcommand};
use output::OutputFormat;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tierline",
    version,
    about = "Vendor grade and tier progression tool for marketplace operators"
)]
struct Cli {
    /// Log engine decisions to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade vendors and place them on the tier ladder
    Grade {
        /// Vendor metrics as JSON (one record or an array) or a CSV export
        input_file: PathBuf,

        /// Custom JSON grading profile
        #[arg(short, long = "profile", value_name = "FILE", conflicts_with = "preset")]
        profile: Option<PathBuf>,

        /// Predefined profile: marketplace, strict (default: marketplace)
        #[arg(short = 'P', long = "preset", value_name = "NAME")]
        preset: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Show per-criterion and per-requirement detail
        #[arg(long)]
        verbose: bool,

        /// Write a decision trace as JSON to this file
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
    },
    /// Check a single metric value against a threshold
    Check {
        /// The metric value
        #[arg(allow_negative_numbers = true)]
        value: Decimal,

        /// Metric name (e.g. return_rate)
        #[arg(short, long)]
        metric: String,

        /// Pass/fail bound
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Decimal,

        /// Treat lower values as better (implied for return and dispute rates)
        #[arg(long)]
        inverse: bool,
    },
    /// Manage and inspect grading profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Explain a profile's criteria, grade scale and tiers in plain language
    Explain {
        /// Preset name (e.g., "marketplace")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

fn init_logging(debug: bool) {
    let default = if debug {
        "tierline_core=debug"
    } else {
        "tierline_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Grade {
            input_file,
            profile,
            preset,
            output,
            verbose,
            trace,
        } => commands::grade::run(input_file, profile, preset, output, verbose, trace),
        Commands::Check {
            value,
            metric,
            threshold,
            inverse,
        } => commands::check::run(value, &metric, threshold, inverse),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Explain { preset } => commands::profiles::explain(&preset),
            ProfilesAction::Schema => commands::profiles::schema(),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
