//! CLI entry point for gamma

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use console::style;
use gamma_core::config::{Config, ConfigLoader};
use gamma_core::limits::UsageStore;
use gamma_core::logging::init_logging;
use gamma_core::session::SessionManager;
use gamma_providers::RemoteGenerator;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gamma")]
#[command(about = "Terminal chat client for the gamma gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat against a running gateway
    Chat {
        /// Chat endpoint URL (defaults to the configured gateway)
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Session identifier sent with every request
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Clear the gateway-side conversation memory
    Reset {
        /// Chat endpoint URL (defaults to the configured gateway)
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Only clear this session
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Show the local usage window
    Status,
}

fn default_endpoint(config: &Config) -> String {
    format!(
        "http://{}:{}/api/chat",
        config.gateway.host, config.gateway.port
    )
}

fn build_generator(
    config: &Config,
    endpoint: Option<String>,
    session: Option<String>,
) -> RemoteGenerator {
    let generator = RemoteGenerator::new(endpoint.unwrap_or_else(|| default_endpoint(config)));
    match session {
        Some(session) => generator.with_session(session),
        None => generator,
    }
}

async fn run_chat(loader: &ConfigLoader, config: &Config, generator: RemoteGenerator) -> Result<()> {
    let manager = SessionManager::new(
        Arc::new(generator),
        UsageStore::new(loader.config_dir()),
        config.limits.clone(),
    );

    println!("{}", style("Starting a new conversation…").dim());
    match manager.create_session().await {
        Ok(session) => {
            if let Some(greeting) = session.messages.first() {
                println!("{} {}", style("gamma>").cyan().bold(), greeting.content);
            }
        }
        Err(e) => {
            println!("{} {}", style("!").red().bold(), e);
            return Ok(());
        }
    }

    let stdin = io::stdin();
    loop {
        print!("{} ", style("you>").green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        match manager.send_message(line).await {
            Ok(()) => {
                if let Some(session) = manager.current_session() {
                    if let Some(reply) = session.messages.last() {
                        println!("{} {}", style("gamma>").cyan().bold(), reply.content);
                    }
                }
            }
            Err(gamma_core::Error::RateLimited(_)) => {
                println!(
                    "{} {}",
                    style("!").yellow().bold(),
                    "You have reached the question limit. Wait up to 2 hours to continue."
                );
            }
            Err(gamma_core::Error::Busy(_)) => {
                println!(
                    "{} {}",
                    style("!").yellow().bold(),
                    "Still waiting on the previous reply."
                );
            }
            Err(e) => {
                println!("{} {}", style("!").red().bold(), e);
            }
        }
    }

    Ok(())
}

fn print_status(loader: &ConfigLoader, config: &Config) {
    let store = UsageStore::new(loader.config_dir());
    let window = Duration::seconds(config.limits.window_secs as i64);
    match store.load_fresh(Utc::now(), window) {
        Some(usage) => {
            println!(
                "Questions used: {} / {}",
                style(usage.count).bold(),
                config.limits.question_limit
            );
            println!("Window started: {}", usage.window_start.to_rfc3339());
            if usage.count >= config.limits.question_limit {
                println!("{}", style("Sends are currently rejected.").yellow());
            }
        }
        None => println!("No sends recorded in the current window."),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    let _guard = init_logging(&config.logging);

    match cli.command {
        Commands::Chat { endpoint, session } => {
            let generator = build_generator(&config, endpoint, session);
            run_chat(&loader, &config, generator).await?;
        }
        Commands::Reset { endpoint, session } => {
            let generator = build_generator(&config, endpoint, session);
            match generator.reset().await {
                Ok(message) => println!("{}", message),
                Err(e) => println!("{} {}", style("!").red().bold(), e),
            }
        }
        Commands::Status => print_status(&loader, &config),
    }

    Ok(())
}
