use std::path::PathBuf;
use std::sync::{Arc, Once};

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sw_core::LanguageModel;
use sw_inference::{ChatConfig, ChatModel};
use sw_search::{SearchClient, SearchConfig};
use sw_spider::{FetchConfig, PageFetcher};
use sw_web::AppState;
use sw_writer::{WriteMode, Writer, WriterConfig};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    });
}

#[derive(Parser)]
#[command(author, version, about = "Search-driven article writer", long_about = None)]
struct Cli {
    /// Aggregator endpoint to search against
    #[arg(long, env = "SW_SEARCH_URL")]
    search_url: Option<String>,
    /// Base URL of the OpenAI-compatible model server
    #[arg(long, env = "SW_MODEL_URL")]
    model_url: Option<String>,
    /// Model name requested from the server
    #[arg(long)]
    model: Option<String>,
    /// API key for the model server
    #[arg(long, env = "SW_API_KEY")]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Aggregator snippets only
    Simple,
    /// Fetch full page text through the headless browser
    Detailed,
}

impl From<ModeArg> for WriteMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => WriteMode::Simple,
            ModeArg::Detailed => WriteMode::Detailed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a full article on a topic
    Write {
        topic: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Simple)]
        mode: ModeArg,
        /// Number of search results to draw sources from (1-5)
        #[arg(long, default_value_t = 1)]
        sources: usize,
        /// Directory the finished article is written to
        #[arg(long, default_value = "output")]
        output: PathBuf,
    },
    /// Summarize sources for a topic without writing a full article
    Research {
        topic: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Detailed)]
        mode: ModeArg,
        /// Merge per-source digests into a single answer
        #[arg(long)]
        merge: bool,
        #[arg(long, default_value_t = 5)]
        sources: usize,
    },
    /// Serve the writer as an HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

fn search_config(cli: &Cli, sources: usize) -> SearchConfig {
    let mut config = SearchConfig::default();
    if let Some(url) = &cli.search_url {
        config.endpoint = url.clone();
    }
    config.result_num = sources.clamp(1, 5);
    config
}

fn chat_config(cli: &Cli) -> ChatConfig {
    let mut config = ChatConfig::default();
    if let Some(url) = &cli.model_url {
        config.base_url = url.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    config.api_key = cli.api_key.clone();
    config
}

fn build_writer(cli: &Cli, mode: WriteMode, sources: usize) -> anyhow::Result<Writer> {
    let model: Arc<dyn LanguageModel> = Arc::new(ChatModel::new(chat_config(cli)));
    info!("🤖 using model {}", model.name());
    let config = WriterConfig {
        mode,
        ..WriterConfig::default()
    };
    Ok(Writer::new(
        SearchClient::new(search_config(cli, sources))?,
        PageFetcher::new(FetchConfig::default()),
        model,
        config,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Write {
            topic,
            mode,
            sources,
            output,
        } => {
            let writer = build_writer(&cli, (*mode).into(), *sources)?;

            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let progress_bar = bar.clone();
            let article = writer
                .write_with_progress(topic, move |index, total, heading| {
                    if progress_bar.length() == Some(0) {
                        progress_bar.set_length(total as u64);
                    }
                    progress_bar.set_position(index as u64);
                    progress_bar.set_message(heading.to_string());
                })
                .await?;
            bar.finish_and_clear();

            let path = article.write_to(output)?;
            info!("📄 article written to {}", path.display());
        }
        Commands::Research {
            topic,
            mode,
            merge,
            sources,
        } => {
            let writer = build_writer(&cli, (*mode).into(), *sources)?;
            let digest = writer.research(topic, *merge).await?;
            println!("{}", digest);
        }
        Commands::Serve { addr } => {
            let model: Arc<dyn LanguageModel> = Arc::new(ChatModel::new(chat_config(&cli)));
            info!("🤖 using model {}", model.name());
            let mut state = AppState::new(model);
            if let Some(url) = &cli.search_url {
                state.search.endpoint = url.clone();
            }
            sw_web::serve(state, addr).await?;
        }
    }

    Ok(())
}
