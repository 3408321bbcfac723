//! helios-cli: terminal front end over the same router as the HTTP API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use helios_core::Domain;
use helios_infra::{AppConfig, AppContext, Database, SystemInfo};
use helios_observability::LogFormat;

#[derive(Parser)]
#[command(name = "helios-cli", version, about = "Agentic ERP assistant")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "ERP_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session. `system` shows database info, `quit` or `exit` leaves.
    Chat,

    /// Route a single request and print the answer.
    Ask {
        /// The request text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Create the ERP tables and load demo data.
    SetupDb,

    /// Show tables, record counts and available agents.
    System,
}

fn print_system_info(info: &SystemInfo) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(info)?);
    Ok(())
}

async fn build_context(db: Option<PathBuf>) -> Result<AppContext> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(path) = db {
        config.db_path = path;
    }
    AppContext::from_config(config)
        .await
        .context("failed to build application context")
}

async fn ask(ctx: &AppContext, text: &str) -> Result<()> {
    let outcome = ctx
        .router
        .route(text, &ctx.config.session_id, &ctx.config.user_id)
        .await;
    if outcome.is_failure() {
        anyhow::bail!(outcome.message());
    }
    println!("{}", outcome.message());
    Ok(())
}

async fn chat(ctx: &AppContext) -> Result<()> {
    println!("Helios ERP assistant. Type 'system' for database info, 'quit' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "system" => {
                print_system_info(&ctx.router.system_info().await?)?;
                continue;
            }
            _ => {}
        }

        let outcome = ctx
            .router
            .route(input, &ctx.config.session_id, &ctx.config.user_id)
            .await;
        println!("Agent [{}]: {}", outcome.domain(), outcome.message());
    }

    println!("Goodbye.");
    Ok(())
}

fn database(db: Option<PathBuf>) -> Database {
    Database::new(db.unwrap_or_else(|| PathBuf::from("erp_sample.db")))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    helios_observability::tracing::init(LogFormat::Compact, "warn");

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat => {
            let ctx = build_context(cli.db).await?;
            chat(&ctx).await?;
        }
        Commands::Ask { text } => {
            let ctx = build_context(cli.db).await?;
            ask(&ctx, &text.join(" ")).await?;
        }
        Commands::SetupDb => {
            let db = database(cli.db);
            db.setup_schema().await.context("failed to create tables")?;
            let seeded = db.seed_demo().await.context("failed to seed demo data")?;
            println!("Database initialized at {}", db.path().display());
            if !seeded.is_empty() {
                println!("Seeded: {}", seeded.join(", "));
            }
        }
        Commands::System => {
            let db = database(cli.db);
            let mut info = db.system_info().await.context("failed to read system info")?;
            info.agents = Domain::ROUTABLE.iter().map(|d| d.to_string()).collect();
            print_system_info(&info)?;
        }
    }

    Ok(())
}
