use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

mod agent;
mod app;
mod client;
mod config;
mod controller;
mod conversation;
mod handler;
mod markdown;
mod tui;
mod ui;

use agent::AgentTag;
use app::App;
use client::BackendClient;
use config::Config;
use controller::QueryController;
use markdown::DisplayBlock;

#[derive(Parser)]
#[command(name = "recife")]
#[command(about = "Chat client for the Dados Recife question-answering service")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "BACKEND_API_URL")]
    backend_url: Option<String>,

    /// Initial specialist agent (GERAL, CULTURA, SAUDE, MOBILIDADE, SERVICOS)
    #[arg(short, long)]
    agent: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single question and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// List the available specialist agents
    Agents,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let backend_url = config.resolve_backend_url(cli.backend_url.as_deref());
    let initial_agent = config.resolve_agent(cli.agent.as_deref());

    match cli.command {
        Some(Commands::Ask { question }) => {
            init_stderr_logging(cli.debug);
            ask_once(&backend_url, initial_agent, &question).await
        }
        Some(Commands::Agents) => {
            list_agents();
            Ok(())
        }
        None => {
            init_file_logging(cli.debug)?;
            run_tui(&backend_url, initial_agent).await
        }
    }
}

async fn run_tui(backend_url: &str, initial_agent: AgentTag) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(backend_url, initial_agent);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event);
        }

        // Finalize the in-flight request once its task completes.
        app.reap_query().await;
    }

    tui::restore()?;
    Ok(())
}

/// One-shot mode: send a single question and print the rendered answer.
async fn ask_once(backend_url: &str, agent: AgentTag, question: &str) -> Result<()> {
    let client = BackendClient::new(backend_url);
    let mut controller = QueryController::new(agent);

    println!(
        "{} {}\n",
        "Consultando o agente".bold().blue(),
        agent.label().bold().magenta()
    );

    if !controller.submit(question, &client).await {
        println!("{}", "Nenhuma pergunta para enviar.".yellow());
        return Ok(());
    }

    if let Some(message) = controller.conversation().last_message() {
        print_blocks(&message.content);
    }

    Ok(())
}

fn list_agents() {
    println!("\n{}", "Agentes especialistas".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for tag in AgentTag::all() {
        println!(
            "  • {} ({}) — {}",
            tag.label().bold().green(),
            tag.wire_name().dimmed(),
            tag.description()
        );
    }
}

fn print_blocks(text: &str) {
    for (i, block) in markdown::render(text).iter().enumerate() {
        if i > 0 {
            println!();
        }
        match block {
            DisplayBlock::Heading { level, text } => {
                let styled = match level {
                    1 => text.bold().cyan(),
                    2 => text.bold().blue(),
                    _ => text.bold().magenta(),
                };
                println!("{styled}");
            }
            DisplayBlock::BulletList { items } => {
                for item in items {
                    println!("{} {}", "•".yellow(), item);
                }
            }
            DisplayBlock::NumberedList { items } => {
                for (n, item) in items.iter().enumerate() {
                    println!("{} {}", format!("{}.", n + 1).yellow(), item);
                }
            }
            DisplayBlock::Paragraph { spans } => {
                let mut line = String::new();
                for span in spans {
                    match span {
                        markdown::Inline::Plain(t) => line.push_str(t),
                        markdown::Inline::Strong(t) => {
                            line.push_str(&t.bold().to_string())
                        }
                        markdown::Inline::Emphasis(t) => {
                            line.push_str(&t.italic().to_string())
                        }
                    }
                }
                println!("{line}");
            }
        }
    }
}

fn init_stderr_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to a file under the data dir.
fn init_file_logging(debug: bool) -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("recife-chat");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("recife.log"))?;

    let default_filter = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
