mod click_cmd;
mod config_cmd;
mod serve_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use clicktrack_config::{config_dir, config_file_path, load_and_prepare};
use clicktrack_logging::init_logger;

#[derive(Parser)]
#[command(name = "clicktrack")]
#[command(about = "Click-tracked article links: gateway and handler simulator")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.clicktrack/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the click-recording gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// YAML list of `{code, url}` articles to register
        #[arg(long)]
        articles: Option<PathBuf>,
    },
    /// Load a page description, click one of its tracked links, and report
    /// where the page ended up
    Click {
        /// YAML page: `url` plus a list of `elements`
        #[arg(long)]
        page: PathBuf,
        /// Which tracked link to click, in document order
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// How long to wait for the delayed navigation
        #[arg(long, default_value_t = 2_000)]
        wait_ms: u64,
    },
    /// Print the effective config
    Config {
        /// Save it to the config path instead of printing
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let prepared = load_and_prepare(&path).await?;

    init_logger(&prepared.config.logging.dir, &prepared.config.logging.level);
    prepared.log_warnings();
    let config = prepared.config;

    match cli.command {
        Commands::Serve { port, articles } => {
            serve_cmd::run(&config, port, articles.as_deref()).await?;
        }
        Commands::Click {
            page,
            index,
            wait_ms,
        } => {
            click_cmd::run(&config, &page, index, wait_ms).await?;
        }
        Commands::Config { write } => config_cmd::run(&config, &path, write).await?,
    }

    Ok(())
}
