mod backend_client;
mod cli;
mod config;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::backend_client::{BackendClient, history_url};
use crate::cli::chat::ChatContext;
use crate::cli::chat::input_source::InputSource;
use crate::config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Send a single query and exit
    #[arg(short, long)]
    input: Option<String>,

    /// Base URL of the generation backend (overrides BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// User identifier to start the session with (overrides USER_ID)
    #[arg(short, long)]
    user_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat {
        /// Send a single query and exit
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the full history link for a user
    Link {
        /// Defaults to the configured user
        user_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?
        .with_overrides(cli.backend_url.as_deref(), cli.user_id.as_deref())?;

    info!("Using backend at {}", config.backend_url);

    let input = match cli.command {
        Some(Commands::Link { user_id }) => {
            let user_id = user_id.unwrap_or_else(|| config.default_user_id.clone());
            println!("{}", history_url(&config, &user_id));
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Chat { input }) => input.or(cli.input),
        None => cli.input,
    };

    let backend = Arc::new(BackendClient::new(&config));
    let interactive = input.is_none();
    let source = if interactive {
        InputSource::terminal()?
    } else {
        InputSource::scripted(Vec::<String>::new())
    };

    let mut chat_context = ChatContext::new(
        Box::new(io::stdout()),
        input,
        interactive,
        config,
        backend,
    );
    chat_context.run(source).await
}
