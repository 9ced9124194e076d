use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cratedig",
    version,
    about = "A toolkit for searching music catalogs and managing playlists from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the music provider via the browser
    Auth {
        /// OAuth timeout in milliseconds
        #[arg(long, env = "CRATEDIG_OAUTH_TIMEOUT_MS")]
        oauth_timeout: Option<u64>,
    },

    /// Remove stored tokens
    Logout,

    /// Show whether stored credentials exist
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user's profile
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Result kind: track, artist, or album
        #[arg(long, default_value = "track")]
        kind: String,

        #[arg(long)]
        json: bool,
    },

    /// Manage the user's playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },

    /// Show the user's most-played tracks or artists
    Top {
        /// What to rank: tracks or artists
        #[arg(default_value = "tracks")]
        kind: String,

        /// Time window: short, medium, or long
        #[arg(long, default_value = "medium")]
        time_range: String,

        #[arg(long)]
        json: bool,
    },

    /// Show the provider's featured playlists
    Featured {
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum PlaylistAction {
    /// List the user's playlists
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create a playlist
    Create {
        /// Playlist name
        name: String,

        /// Playlist description
        #[arg(long, default_value = "")]
        description: String,

        /// Make the playlist public
        #[arg(long)]
        public: bool,

        #[arg(long)]
        json: bool,
    },

    /// Add tracks to a playlist
    Add {
        /// Playlist id
        playlist_id: String,

        /// Track URIs to add
        uris: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display the effective config with secrets redacted
    Show,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CRATEDIG_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = wants_json(&cli.command);

    if let Err(e) = run(cli).await {
        cratedig::cli::output::print_error(&e, json_mode);
        std::process::exit(1);
    }
}

fn wants_json(command: &Commands) -> bool {
    match command {
        Commands::Status { json }
        | Commands::Whoami { json }
        | Commands::Search { json, .. }
        | Commands::Top { json, .. }
        | Commands::Featured { json } => *json,
        Commands::Playlist { action } => match action {
            PlaylistAction::List { json }
            | PlaylistAction::Create { json, .. }
            | PlaylistAction::Add { json, .. } => *json,
        },
        Commands::Auth { .. } | Commands::Logout | Commands::Config { .. } => false,
    }
}

async fn run(cli: Cli) -> Result<(), cratedig::CratedigError> {
    match cli.command {
        Commands::Auth { oauth_timeout } => {
            let timeout = std::time::Duration::from_millis(oauth_timeout.unwrap_or(120_000));
            cratedig::cli::auth::run_auth(timeout).await
        }
        Commands::Logout => cratedig::cli::auth::run_logout().await,
        Commands::Status { json } => cratedig::cli::auth::run_status(json).await,
        Commands::Whoami { json } => cratedig::cli::auth::run_whoami(json).await,
        Commands::Search { query, kind, json } => {
            cratedig::cli::search::run_search(&query, &kind, json).await
        }
        Commands::Playlist { action } => match action {
            PlaylistAction::List { json } => cratedig::cli::playlists::run_playlist_list(json).await,
            PlaylistAction::Create {
                name,
                description,
                public,
                json,
            } => {
                cratedig::cli::playlists::run_playlist_create(&name, &description, public, json)
                    .await
            }
            PlaylistAction::Add {
                playlist_id,
                uris,
                json,
            } => cratedig::cli::playlists::run_playlist_add(&playlist_id, &uris, json).await,
        },
        Commands::Top {
            kind,
            time_range,
            json,
        } => cratedig::cli::browse::run_top(&kind, &time_range, json).await,
        Commands::Featured { json } => cratedig::cli::browse::run_featured(json).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => cratedig::cli::config_cmd::run_config_show().await,
        },
    }
}
