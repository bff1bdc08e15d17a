use anyhow::Result;
use clap::Parser;
use tracing::info;

use taskdeck::cli::board_ui::BoardUi;
use taskdeck::config::Config;
use taskdeck::controller::Controller;
use taskdeck::tasks::SnapshotStore;

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "taskdeck — personal task list in the terminal",
    version
)]
struct Args {
    /// Data directory for the task snapshot, config, and logs
    #[arg(long, env = "TASKDECK_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Path of the task snapshot file (default: {data_dir}/tasks.json)
    #[arg(long, env = "TASKDECK_TASKS_FILE")]
    tasks_file: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKDECK_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily; default: {data_dir}/taskdeck.log)
    #[arg(long, env = "TASKDECK_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Log output format: "pretty" (default) | "json"
    #[arg(long, env = "TASKDECK_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(
        args.data_dir,
        args.tasks_file,
        args.log,
        args.log_file,
        args.log_format,
    );

    let _guard = setup_logging(&config.log, &config.log_file, &config.log_format);
    info!(tasks_file = %config.tasks_file.display(), "starting taskdeck");

    let controller = Controller::open(SnapshotStore::new(&config.tasks_file)).await;
    let result = BoardUi::new(controller).run().await;

    info!("taskdeck exited");
    result
}

/// Initialize the tracing subscriber.
///
/// The TUI owns stdout, so logs go only to a daily-rolling file. Returns
/// a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact
/// format) or `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, logging is disabled rather
/// than scribbling over the interface — never panics.
fn setup_logging(
    log_level: &str,
    log_file: &std::path::Path,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let dir = log_file.parent().unwrap_or_else(|| std::path::Path::new("."));
    let filename = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("taskdeck.log"));

    // Ensure the directory exists before tracing-appender tries to open it.
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e} — logging disabled",
            dir.display()
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().compact().with_writer(non_blocking))
            .init();
    }

    Some(guard)
}
