//! Oplog - render operation log templates from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oplog::config::{ConfigError, ConfigLoader, OplogConfig};
use oplog::context::{Context, ContextError, Value};
use oplog::display;
use oplog::engine::TemplateEngine;
use oplog::handlers::HandlerCatalog;
use oplog::record::{ChannelSink, OperationLog, RecordError, Recorder};

#[derive(Parser)]
#[command(
    name = "oplog",
    about = "Render operation log templates against a JSON context",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: .oplog.toml, then the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render templates, one output line per template.
    Render {
        /// JSON object used as the render context.
        #[arg(long)]
        context: PathBuf,
        /// Show how each placeholder resolved instead of the rendered text.
        #[arg(long)]
        explain: bool,
        /// Do not truncate values in explain output.
        #[arg(long)]
        raw: bool,
        #[arg(required = true)]
        templates: Vec<String>,
    },
    /// Compose audit records and print them as JSON lines.
    Record {
        #[arg(long)]
        context: PathBuf,
        /// Message template.
        #[arg(long)]
        content: String,
        /// Business id template; a JSON array result yields one record per id.
        #[arg(long)]
        biz_no: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        action: String,
        /// JSON response checked by the recording policy. Without it every
        /// operation is recorded.
        #[arg(long)]
        response: Option<PathBuf>,
        /// Print a colored summary per record to stderr.
        #[arg(long)]
        summary: bool,
    },
    /// List the configured handler chain.
    Handlers,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Errors surfaced by the command line.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Context {
        path: PathBuf,
        source: ContextError,
    },

    #[error("Failed to parse response {}: {source}", path.display())]
    Response {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Record printer task failed: {0}")]
    Printer(#[from] tokio::task::JoinError),
}

fn load_config(path: Option<PathBuf>) -> Result<OplogConfig, CliError> {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    Ok(loader.load()?)
}

fn read_json(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_context(path: &Path) -> Result<Context, CliError> {
    Context::from_json_str(&read_json(path)?).map_err(|source| CliError::Context {
        path: path.to_path_buf(),
        source,
    })
}

fn load_response(path: &Path) -> Result<Value, CliError> {
    serde_json::from_str::<serde_json::Value>(&read_json(path)?)
        .map(Value::from)
        .map_err(|source| CliError::Response {
            path: path.to_path_buf(),
            source,
        })
}

fn render(
    config: &OplogConfig,
    context: &Path,
    templates: Vec<String>,
    explain: bool,
    raw: bool,
) -> Result<(), CliError> {
    let ctx = load_context(context)?;
    let catalog = HandlerCatalog::standard();
    let mut engine = TemplateEngine::from_config(&ctx, config, &catalog);

    if explain {
        for template in &templates {
            display::print_template(template);
            for resolution in engine.explain(template) {
                display::print_resolution(&resolution, raw);
            }
        }
        return Ok(());
    }

    for template in templates {
        engine.enqueue(template);
    }
    for line in engine.render_all() {
        println!("{line}");
    }
    Ok(())
}

async fn record(
    mut config: OplogConfig,
    context: &Path,
    log: OperationLog,
    response: Option<&Path>,
    summary: bool,
) -> Result<(), CliError> {
    let ctx = load_context(context)?;
    let response = response.map(load_response).transpose()?;
    if response.is_none() && config.recording.only_success {
        tracing::debug!("No response given, recording every operation");
        config.recording.only_success = false;
    }

    let (sink, mut rx) = ChannelSink::new(64);
    let printer = tokio::spawn(async move {
        let mut lines = Vec::new();
        while let Some(record) = rx.recv().await {
            if summary {
                display::print_record_summary(&record, false);
            }
            lines.push(record.to_json_line());
        }
        lines
    });

    let recorder = Recorder::new(config, sink);
    let count = recorder.record(&log, &ctx, response.as_ref()).await?;
    drop(recorder);

    for line in printer.await? {
        println!("{}", line?);
    }
    tracing::info!(count, "Records written");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Render {
            context,
            explain,
            raw,
            templates,
        } => render(&config, &context, templates, explain, raw),
        Commands::Record {
            context,
            content,
            biz_no,
            category,
            action,
            response,
            summary,
        } => {
            let log = OperationLog::new(content, biz_no)
                .category(category)
                .action(action);
            record(config, &context, log, response.as_deref(), summary).await
        }
        Commands::Handlers => {
            let ctx = Context::new();
            let engine = TemplateEngine::from_config(&ctx, &config, &HandlerCatalog::standard());
            display::print_handler_chain(engine.registry());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
