use anyhow::Result;
use clap::{Parser, Subcommand};
use poliq_api::Feedback;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "poliq")]
#[command(about = "Poliq CLI - insurance policy document Q&A client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account and store the session token
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Log in and store the session token
    Login { username: String, password: String },
    /// Log out and erase the stored session token
    Logout,
    /// Show session, document, and history state
    Status,
    /// Upload a policy document and bind it for queries
    Upload { file: PathBuf },
    /// Ask a question about the uploaded document
    Ask {
        /// The question; multiple words are joined with spaces
        question: Vec<String>,
    },
    /// Rate the latest answer
    Feedback {
        /// "up" or "down"
        rating: Feedback,
    },
    /// Review past queries
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List past queries, newest first
    List,
    /// Show one past query and its answer
    Show { id: String },
    /// Remove a past query by id
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::utils::init().await?;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&ctx, &username, &email, &password).await?,
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &username, &password).await?
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Status => commands::auth::status(&ctx).await?,
        Commands::Upload { file } => commands::document::upload(&ctx, &file).await?,
        Commands::Ask { question } => {
            commands::query::ask(&ctx, &question.join(" ")).await?
        }
        Commands::Feedback { rating } => commands::query::feedback(&ctx, rating).await?,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list(&ctx).await?,
            HistoryAction::Show { id } => commands::history::show(&ctx, &id).await?,
            HistoryAction::Remove { id } => commands::history::remove(&ctx, &id).await?,
        },
    }

    Ok(())
}
