use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use log::info;
use std::{io, path::PathBuf};
use tui_logger::{
    TuiLoggerFile, TuiLoggerLevelOutput, init_logger, set_default_level, set_log_file,
};

use crate::{
    app::App, commands::ThreadQuery, config::ViewerConfig, dump::Document, report::OutputFormat,
};

pub mod app;
pub mod commands;
pub mod config;
pub mod dump;
pub mod event;
pub mod report;
pub mod resample;
pub mod table;
pub mod timeline;
pub mod ui;

#[derive(Parser, Debug)]
#[command(about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = config::DEFAULT_FILE)]
    config: PathBuf,
    /// Dump to open in the viewer when no command is given
    #[arg(value_name = "DUMP")]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse a ttop dump interactively
    View { file: PathBuf },
    /// Print one line per snapshot
    Summary {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the thread table of the latest snapshot or a time range
    Threads {
        file: PathBuf,
        #[command(flatten)]
        query: ThreadQuery,
    },
    /// Report everything the parser dropped
    Validate {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = ViewerConfig::load(&cli.config)?;
    let mut out = io::stdout();
    match cli.command {
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Summary { file, format }) => commands::summary(&mut out, &file, format),
        Some(Commands::Validate { file, format }) => {
            let document = Document::load(file)?;
            commands::validate(&mut out, document.report(), &document.file_path, format)
        }
        Some(Commands::Threads { file, query }) => {
            let document = Document::load(file)?;
            commands::threads(&mut out, document.summaries(), &query, &config)
        }
        Some(Commands::View { file }) => view(file, config).await,
        None => match cli.file {
            Some(file) => view(file, config).await,
            None => Err(eyre!("no dump given, try `sjkview view <FILE>`")),
        },
    }
}

async fn view(file: PathBuf, config: ViewerConfig) -> Result<()> {
    init_logger(tui_logger::LevelFilter::Debug)?;
    let file_options = TuiLoggerFile::new("sjkview.log")
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_file(false)
        .output_separator(':');
    set_log_file(file_options);
    info!("Logging started");
    let mut app = App::new(file, config)?;
    set_default_level(tui_logger::LevelFilter::Debug);
    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}
