use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use error_pages::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "error-pages", version, about = "Render HTTP error pages from templates")]
struct Args {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    command: ErrorPagesCommand,
}

#[derive(Parser)]
struct BuildArgs {
    /// The directory to write the error pages to
    output_directory: PathBuf,

    /// Generate an index page listing every error page
    #[arg(short, long, default_value = "false")]
    index: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// The template to render pages with (defaults to the first configured)
    #[arg(short, long)]
    template: Option<String>,

    /// Open the server in the default browser
    #[arg(short, long, default_value = "false")]
    open: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,
}

#[derive(Subcommand)]
enum ErrorPagesCommand {
    /// Build the error pages
    #[command(alias = "b")]
    Build(BuildArgs),

    /// Serve the error pages, rendering them on each request
    #[command(alias = "s")]
    Serve(ServeArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        ErrorPagesCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        ErrorPagesCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
    }

    Ok(())
}
