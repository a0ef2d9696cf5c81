//! SalesDash CLI - product sales and cancellations report.

mod colors;
mod render;
mod serve;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use salesdash_core::page::DEFAULT_DATA_PATH;
use salesdash_core::{PageController, ReportConfig, ReportContent};

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(about = "Product sales and cancellations report")]
#[command(version)]
struct Cli {
    /// Defaults to `render` with default paths
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the report to a file or stdout
    Render {
        /// Transaction dataset (CSV with header)
        #[arg(long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Report wording (JSON), defaults to the built-in content
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output path (html defaults to report.html, text and json to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },

    /// Serve the report over HTTP, re-rendering on every request
    Serve {
        /// Transaction dataset (CSV with header)
        #[arg(long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Report wording (JSON), defaults to the built-in content
        #[arg(long)]
        content: Option<PathBuf>,

        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format salesdash-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<salesdash_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else if let Some(salesdash_server::ServerError::Core(core_err)) =
            err.downcast_ref::<salesdash_server::ServerError>()
        {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let command = cli.command.unwrap_or(Commands::Render {
        data: PathBuf::from(DEFAULT_DATA_PATH),
        content: None,
        output: None,
        format: OutputFormat::Html,
    });

    match command {
        Commands::Render {
            data,
            content,
            output,
            format,
        } => {
            render::execute(&data, content.as_deref(), output.as_deref(), format).map_err(format_error)?;
        }

        Commands::Serve {
            data,
            content,
            host,
            port,
        } => {
            serve::execute(&data, content.as_deref(), host, port).await.map_err(format_error)?;
        }
    }

    Ok(())
}

/// Page controller for a dataset, with content from `content` or the
/// built-in wording.
fn build_controller(data: &Path, content: Option<&Path>) -> anyhow::Result<PageController> {
    let content = match content {
        Some(path) => ReportContent::from_path(path)?,
        None => ReportContent::builtin()?,
    };
    let config = ReportConfig::default().with_data_path(data);
    Ok(PageController::new(config, content))
}
