use ads_cli::CliContext;
use ads_cli::commands;
use ads_cli::logging;
use ads_cli::readline;
use ads_core::{AdsConfig, AdsConfigExt};
use clap::{Parser, Subcommand};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    let config = AdsConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Using default configuration");
        AdsConfig::load_with_defaults()
    });
    if let Some(path) = AdsConfig::config_path() {
        tracing::info!(config = ?path, "Configuration loaded");
    }

    let ctx = CliContext::new(config).map_err(|e| e.to_string())?;
    println!("AdS - Aufmerksamkeit der Schüler (type `help` for commands)");

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "AdS scheduler console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sound catalog and current selection
    Sounds,
    /// Select or deselect a sound for random play
    Toggle { id: String },
    /// Deselect every sound
    ResetSounds,
    /// Maximum minutes between plays (0-60)
    Frequency {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Playback volume in percent (0-100)
    Volume {
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    /// Restore frequency and volume defaults
    ResetSettings,
    /// Play a sound now without logging it (row number from `sounds`, or an id)
    Test { sound: String },
    Start,
    Stop,
    /// START when idle, STOP when running
    Go,
    Status,
    Log,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "ads".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Sounds) => commands::list_sounds(ctx).await,
        Some(Commands::Toggle { id }) => commands::toggle_sound(id, ctx).await,
        Some(Commands::ResetSounds) => commands::reset_sounds(ctx).await,
        Some(Commands::Frequency { minutes }) => commands::set_frequency(*minutes, ctx).await,
        Some(Commands::Volume { percent }) => commands::set_volume(*percent, ctx).await,
        Some(Commands::ResetSettings) => commands::reset_settings(ctx).await,
        Some(Commands::Test { sound }) => commands::test_play(sound, ctx).await,
        Some(Commands::Start) => commands::start(ctx).await,
        Some(Commands::Stop) => commands::stop(ctx).await,
        Some(Commands::Go) => commands::toggle_run(ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Log) => commands::show_log(ctx).await,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
