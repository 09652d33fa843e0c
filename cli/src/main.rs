use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sends_client::{ApiClient, Config};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Overrides SENDS_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every climber.
    Climbers,

    /// Register a climber.
    AddClimber {
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        nickname: Option<String>,
    },

    /// Remove a climber together with their scores.
    DeleteClimber { climber: u32 },

    /// Show a climber's log.
    Scores { climber: u32 },

    /// Log a climb. Gym, area, wall and grade accept a name or an id.
    Log {
        climber: u32,

        #[arg(long)]
        gym: String,

        #[arg(long)]
        area: String,

        #[arg(long)]
        wall: String,

        /// Route number, required on rope walls.
        #[arg(long)]
        rope: Option<u32>,

        #[arg(long)]
        grade: String,

        #[arg(long, default_value_t = 1)]
        attempts: u32,

        /// Record an attempt instead of a send.
        #[arg(long)]
        failed: bool,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove one entry from a climber's log.
    DeleteScore { climber: u32, score_id: u32 },

    /// Thirty-day statistics and average-grade gauges.
    Dashboard { climber: u32 },

    /// Sends from the last week across all climbers.
    Recent {
        #[arg(long, default_value_t = sends_scoring::feed::DEFAULT_MAX_ITEMS)]
        max_items: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let mut config = Config::load().context("Environment misconfigured")?;
    if let Some(api_url) = &args.api_url {
        config = config.with_api_url(api_url)?;
    }

    let api = ApiClient::new(&config).context("Failed to build HTTP client")?;

    match args.command {
        Command::Climbers => commands::climbers(&api).await,
        Command::AddClimber {
            name,
            email,
            nickname,
        } => commands::add_climber(&api, &name, &email, nickname.as_deref()).await,
        Command::DeleteClimber { climber } => commands::delete_climber(&api, climber).await,
        Command::Scores { climber } => commands::scores(api, climber).await,
        Command::Log {
            climber,
            gym,
            area,
            wall,
            rope,
            grade,
            attempts,
            failed,
            notes,
        } => {
            let entry = commands::LogEntry {
                gym,
                area,
                wall,
                rope,
                grade,
                attempts,
                completed: !failed,
                notes,
            };

            commands::log(api, climber, entry).await
        }
        Command::DeleteScore { climber, score_id } => {
            commands::delete_score(api, climber, score_id).await
        }
        Command::Dashboard { climber } => commands::dashboard(&api, climber).await,
        Command::Recent { max_items } => commands::recent(&api, max_items).await,
    }
}
