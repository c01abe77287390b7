//! storage-cli: upload, delete and probe files through a storage driver

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use storage_drivers::DriverKind;
use storage_drivers::cli::commands::{
    UploadArgs, handle_delete, handle_exists, handle_upload, open_driver,
};
use storage_drivers::cli::config::CliConfig;
use storage_drivers::cli::output::{format_json_output, format_pretty_output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storage-cli", version, about = "Store files through a pluggable storage driver")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Driver to use: local, remote, memory (overrides the config file)
    #[arg(short, long, global = true)]
    driver: Option<DriverKind>,

    /// Public base URL (overrides the config file)
    #[arg(long, global = true)]
    domain: Option<String>,

    /// Storage root (overrides the config file)
    #[arg(long, global = true)]
    save_path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and store a local file
    Upload {
        /// Local file to upload
        source: PathBuf,
        /// Target path relative to save_path
        target: String,
        /// Replace an existing file at the target
        #[arg(long)]
        overwrite: bool,
        /// Largest accepted size in bytes
        #[arg(long)]
        max_size: Option<u64>,
        /// Accepted extensions, comma separated
        #[arg(long, value_delimiter = ',')]
        allow_ext: Vec<String>,
    },
    /// Delete a stored file
    Delete { path: String },
    /// Check whether a stored file exists
    Exists { path: String },
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    }
    .with_cli_overrides(cli.driver, cli.domain, cli.save_path);

    let kind = config.driver.unwrap_or_default();
    let mut driver = open_driver(kind, config.storage)
        .with_context(|| format!("Failed to configure {} driver", kind))?;

    let result = match cli.command {
        Command::Upload {
            source,
            target,
            overwrite,
            max_size,
            allow_ext,
        } => handle_upload(
            driver.as_mut(),
            UploadArgs {
                source,
                target,
                overwrite,
                max_size,
                allow_exts: allow_ext,
            },
        )?,
        Command::Delete { path } => handle_delete(driver.as_ref(), &path)?,
        Command::Exists { path } => handle_exists(driver.as_ref(), &path)?,
    };

    let output = match cli.format {
        Format::Pretty => format_pretty_output(&result),
        Format::Json => format_json_output(&result),
    };
    println!("{}", output.trim_end());

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
