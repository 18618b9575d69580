use clap::{Parser, ValueEnum};
use petswipe::config::Settings;
use petswipe::core::{RenderOutcome, Session};
use petswipe::models::{Candidate, CandidateId, DecisionKind};
use petswipe::services::{ConsoleNotifier, HttpBackend, LogNotifier, Notifier, NotifierKind};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Headless petswipe client
#[derive(Debug, Parser)]
#[command(name = "petswipe", version, about)]
struct Cli {
    /// Page to open
    #[arg(value_enum, default_value_t = Page::Index)]
    page: Page,

    /// Candidate ids listed on a hearted/previous page
    #[arg(long = "pet")]
    pets: Vec<String>,

    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Index,
    Hearted,
    Previous,
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    if settings.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

fn print_help() {
    println!("commands: skip [id] | heart [id] | show | help | quit");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    init_logging(&settings);

    info!("Starting petswipe against {}", settings.backend.base_url);

    let backend = Arc::new(HttpBackend::from_settings(&settings.backend)?);
    let notifier: Arc<dyn Notifier> = match settings.notifications.sink {
        NotifierKind::Console => Arc::new(ConsoleNotifier),
        NotifierKind::Log => Arc::new(LogNotifier),
    };

    let session = match cli.page {
        Page::Index => {
            let session = Session::index(None, backend, notifier, &settings.interaction);
            match session.load_first().await {
                RenderOutcome::Mounted(id) => info!("Showing pet {}", id),
                RenderOutcome::Exhausted => info!("Feed is empty"),
                RenderOutcome::NoContainer | RenderOutcome::Failed => {
                    error!("Could not load the first pet from {}", settings.backend.base_url)
                }
            }
            session
        }
        Page::Hearted | Page::Previous => {
            let candidates: Vec<Candidate> = cli
                .pets
                .iter()
                .map(|id| Candidate {
                    id: CandidateId::new(id.as_str()),
                    name: Some(format!("Pet {}", id)),
                    image_url: None,
                    gender: None,
                    age: None,
                    size: None,
                    breed: None,
                    description: None,
                })
                .collect();
            Session::list(&candidates, backend, notifier, &settings.interaction)
        }
    };

    println!("{}", session.describe());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let candidate_id = words.next().map(CandidateId::new);

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "show" => {
                println!("{}", session.describe());
                let ids: Vec<String> = session.visible_candidates().iter().map(|id| id.to_string()).collect();
                println!("cards: [{}]", ids.join(", "));
            }
            other => match other.parse::<DecisionKind>() {
                Ok(kind) => {
                    if session.click(kind, candidate_id.as_ref()).is_none() {
                        println!("no {} control for that pet", kind);
                    }
                }
                Err(_) => print_help(),
            },
        }
    }

    info!("Shutting down");
    Ok(())
}
