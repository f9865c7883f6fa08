use anyhow::Result;
use clap::{Parser, Subcommand};

use herrs::BacktraceStack;
use herrs_cli::{RenderArgs, lookup, render_json, render_table, run_demo};

#[derive(Parser, Debug)]
#[command(
    name = "herrs",
    about = "herrs: inspect the error kind registry and preview log lines",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every error kind with its code, tag and HTTP status
    Kinds {
        /// Print the registry as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the tag and HTTP status for a persisted kind code
    Lookup {
        /// Numeric kind code (0 means unset)
        code: u8,
    },

    /// Build a sample error chain and log it
    Demo {
        #[command(flatten)]
        render: RenderArgs,
    },
}

pub fn run(args: Cli) -> Result<()> {
    // The log sink; the library only emits events.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Kinds { json } => {
            if json {
                println!("{}", render_json()?);
            } else {
                print!("{}", render_table());
            }
        }
        Command::Lookup { code } => {
            println!("{}", lookup(code));
        }
        Command::Demo { render } => {
            let report = run_demo(&render.to_render_options(), &BacktraceStack);
            tracing::info!(status = report.status, "demo complete");
            println!("status: {}", report.status);
            println!("message: {}", report.flattened);
        }
    }

    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
