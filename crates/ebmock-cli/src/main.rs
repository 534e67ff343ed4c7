mod commands;

use clap::{Parser, Subcommand};
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SCRIPT_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "ebmock",
    version,
    about = "Behavioral test double for an application-platform control API"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a request script on a simulated clock, one JSON line per response.
    Run {
        /// Path to the script: a JSON array of requests and clock advances.
        script: PathBuf,
        /// Engine configuration TOML file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Exit non-zero if any request in the script failed.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Validate request parameters for one operation without running it.
    Validate {
        /// Operation name, e.g. createEnvironment.
        operation: String,
        /// Request parameters as a JSON object.
        params: String,
    },
    /// List the accepted solution stacks.
    Stacks,
    /// List every accepted operation and how it is handled.
    Operations,
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("EBMOCK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Run {
            script,
            config,
            strict,
        } => commands::run::run(&script, config.as_deref(), strict),
        Commands::Validate { operation, params } => {
            commands::validate::run(&operation, &params, json_output)
        }
        Commands::Stacks => commands::stacks::run(json_output),
        Commands::Operations => commands::operations::run(json_output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("configuration error:") {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("script error:") {
                EXIT_SCRIPT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
