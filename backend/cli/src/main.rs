mod app;
mod config_cmd;
mod doctor_cmd;
mod favorites_cmd;
mod say_cmd;
mod scan_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use app::App;
use scan_cmd::Then;

#[derive(Parser)]
#[command(name = "readaloud")]
#[command(about = "Scan text from images, hear it spoken, keep favorite words")]
#[command(version)]
struct Cli {
    /// Config file (default: $READALOUD_CONFIG_DIR/config.yaml or ~/.readaloud/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run playback against a silent host
    #[arg(long, global = true)]
    mute: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak a word or phrase
    Say {
        word: String,
        /// Strip periods and commas and lowercase first
        #[arg(long)]
        clean: bool,
    },
    /// Save the spoken word as a WAV file
    Download {
        word: String,
        /// File name (default: <word>.wav)
        #[arg(long)]
        filename: Option<String>,
        /// Output directory (default: download.dir or the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Recognize the text in an image and list its lines
    Scan { image: PathBuf },
    /// Recognize the text in an image and speak all of it
    Read { image: PathBuf },
    /// Recognize the text in an image and add every line to favorites
    Favorite { image: PathBuf },
    /// List favorite words
    Favorites,
    /// Check audio support and configuration
    Doctor,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config with secrets masked
    Show,
    /// Write a config file with all defaults
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| readaloud_config::config_file_path(&readaloud_config::config_dir()));

    // `config` subcommands work on the raw file and must not need env vars.
    if let Commands::Config { action } = &cli.command {
        readaloud_logging::init_logger(None, "warn", false);
        let result = match action {
            ConfigAction::Show => config_cmd::show(&config_path).await,
            ConfigAction::Init { force } => config_cmd::init(&config_path, *force).await,
        };
        return exit_code(result.map(|()| true));
    }

    let config = match readaloud_config::load_and_prepare(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            terminal_output::note_error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };
    readaloud_logging::init_logger(
        config.log_dir().map(PathBuf::as_path),
        config.log_level(),
        config.log_json(),
    );

    let app = App::new(config, cli.mute);
    let result = match cli.command {
        Commands::Say { word, clean } => say_cmd::say(&app, &word, clean).await,
        Commands::Download { word, filename, dir } => {
            say_cmd::download(&app, &word, filename.as_deref(), dir).await
        }
        Commands::Scan { image } => scan_cmd::run(&app, &image, Then::Print).await,
        Commands::Read { image } => scan_cmd::run(&app, &image, Then::PlayAll).await,
        Commands::Favorite { image } => scan_cmd::run(&app, &image, Then::FavoriteAll).await,
        Commands::Favorites => favorites_cmd::run(&app).await.map(|()| true),
        Commands::Doctor => doctor_cmd::run(&app, &config_path).await,
        Commands::Config { .. } => Ok(true),
    };
    exit_code(result)
}

fn exit_code(result: Result<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Command failed");
            terminal_output::note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
