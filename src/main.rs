use std::fs::File;
use std::path::PathBuf;

use ccmanager::Tab;
use ccmanager::core::config::{self, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "ccmanager", about = "Terminal dashboard for Claude Code sessions")]
struct Args {
    /// Tab to open on startup
    #[arg(short, long, value_enum)]
    tab: Option<Tab>,

    /// Answer mock API calls immediately
    #[arg(long)]
    no_latency: bool,

    /// Show message text as-is instead of rendering markdown
    #[arg(long)]
    plain: bool,

    /// Directory for session exports
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (Default::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            tab: args.tab,
            no_latency: args.no_latency,
            plain: args.plain,
            export_dir: args.export_dir,
            log_file: args.log_file,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "ccmanager starting on tab {:?} (latency: {}, markdown: {})",
        resolved.initial_tab,
        resolved.latency.name(),
        resolved.render_markdown
    );

    ccmanager::tui::run(resolved)
}
