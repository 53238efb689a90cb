use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_agent::api::{self, state::AppState};
use scout_agent::config::AppConfig;
use scout_agent::fetch::{GridClient, MatchFetcher, SeriesSource};
use scout_agent::models::GameTitle;
use scout_agent::service::{ScoutingService, DEFAULT_OPPONENT_MATCHES, DEFAULT_OUR_MATCHES};
use scout_agent::strategy::{backend_from_config, StrategySynthesizer};

#[derive(Parser)]
#[command(name = "scout-agent")]
#[command(about = "Esports scouting reports with AI-assisted counter-strategy")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Serve canned match data instead of calling the remote API
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate a scouting report for a team
    Report {
        /// Team to scout
        #[arg(long)]
        team_id: String,

        /// Game title (lol, valorant)
        #[arg(long)]
        game: String,

        /// Number of recent series to analyze
        #[arg(long, default_value_t = DEFAULT_OPPONENT_MATCHES)]
        num_matches: usize,
    },

    /// Rank a team's players by threat level
    Threats {
        /// Team to analyze
        #[arg(long)]
        team_id: String,

        /// Game title (lol, valorant)
        #[arg(long)]
        game: String,

        /// Number of recent series to analyze
        #[arg(long, default_value_t = DEFAULT_OPPONENT_MATCHES)]
        limit: usize,
    },

    /// Generate a counter-strategy against an opponent
    Counter {
        /// Opponent team
        #[arg(long)]
        opponent: String,

        /// Our team
        #[arg(long)]
        ours: String,

        /// Game title (lol, valorant)
        #[arg(long)]
        game: String,

        /// Opponent series to analyze
        #[arg(long, default_value_t = DEFAULT_OPPONENT_MATCHES)]
        opponent_matches: usize,

        /// Our series to analyze
        #[arg(long, default_value_t = DEFAULT_OUR_MATCHES)]
        our_matches: usize,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = PathBuf::from(&cli.config);
    let mut config = if path.exists() {
        AppConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?
    } else {
        tracing::info!("No config file at {}, using defaults", path.display());
        AppConfig::default()
    };

    if cli.mock {
        config.grid.use_mock = true;
    }

    Ok(config)
}

fn build_service(config: &AppConfig) -> Result<ScoutingService> {
    let client = Arc::new(GridClient::new(config.grid.clone())?);
    let fetcher = MatchFetcher::new(
        Arc::clone(&client) as Arc<dyn SeriesSource>,
        config.grid.detail_concurrency,
    );
    let backend = backend_from_config(&config.ai)?;
    let synthesizer = StrategySynthesizer::new(Arc::from(backend), config.ai.max_tokens);

    Ok(ScoutingService::new(client, fetcher, synthesizer))
}

fn parse_title(game: &str) -> Result<GameTitle> {
    game.parse::<GameTitle>().map_err(anyhow::Error::msg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting scout-agent v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let service = Arc::new(build_service(&config)?);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(service);
            let app = api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Report {
            team_id,
            game,
            num_matches,
        } => {
            let title = parse_title(&game)?;
            let report = service.scouting_report(&team_id, num_matches, title).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Threats {
            team_id,
            game,
            limit,
        } => {
            let title = parse_title(&game)?;
            let ranking = service.threat_ranking(&team_id, limit, title).await?;
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        }
        Commands::Counter {
            opponent,
            ours,
            game,
            opponent_matches,
            our_matches,
        } => {
            let title = parse_title(&game)?;
            let brief = service
                .generate_counter_strategy(&opponent, &ours, title, opponent_matches, our_matches)
                .await?;
            println!("{}", serde_json::to_string_pretty(&brief)?);
        }
    }

    Ok(())
}
