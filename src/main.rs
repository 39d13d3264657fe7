//! Pomodoro Cycle CLI - a work/break countdown for the terminal
//!
//! The timer alternates two phases:
//! - Work (25 minutes by default)
//! - Break (5 minutes by default)
//!
//! Each phase change rings an alert, posts a notification and starts the
//! next countdown on its own.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use pomodoro_cycle::cli::{
    Cli, Commands, ConfigCommand, Display, RunArgs, Session, StdinLines, TerminalDisplay,
};
use pomodoro_cycle::engine::{Capabilities, Controller, IntervalScheduler, SystemClock};
use pomodoro_cycle::notification::{DesktopNotifier, Permission};
use pomodoro_cycle::settings::{load_durations, save_durations, DurationSettings, JsonFileStore};
use pomodoro_cycle::sound::{
    get_default_sound, resolve_sound, try_create_player, Alerter, BellPlayer, SoundPlayer,
};
use pomodoro_cycle::wakelock::{inhibitor_available, InhibitorWakeLock, NoopWakeLock, WakeLock};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so the status line on stdout stays intact.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let store = open_store(cli.config_dir.as_deref())?;
            run_session(args, store).await?;
        }
        Some(Commands::Config(command)) => {
            let store = open_store(cli.config_dir.as_deref())?;
            execute_config(command, &store)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the durations store in `config_dir` or the user config directory.
fn open_store(config_dir: Option<&Path>) -> Result<JsonFileStore> {
    match config_dir {
        Some(dir) => Ok(JsonFileStore::in_dir(dir)),
        None => JsonFileStore::default_location().context("Cannot locate the settings directory"),
    }
}

/// Executes a `config` subcommand.
fn execute_config(command: ConfigCommand, store: &JsonFileStore) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            Display::show_config(&load_durations(store), Some(store.path()));
        }
        ConfigCommand::Set(args) => {
            let mut settings = load_durations(store);
            if let Some(work) = args.work {
                settings.work = work;
            }
            if let Some(break_time) = args.break_time {
                settings.break_time = break_time;
            }
            save_durations(store, &settings).context("Failed to save durations")?;
            Display::show_config_saved(&settings);
        }
        ConfigCommand::Reset => {
            let settings = DurationSettings::default();
            save_durations(store, &settings).context("Failed to save durations")?;
            Display::show_config_saved(&settings);
        }
    }
    Ok(())
}

/// Runs an interactive session on stdin/stdout.
async fn run_session(args: RunArgs, store: JsonFileStore) -> Result<()> {
    let source = match args.sound.as_deref() {
        Some(name) => resolve_sound(name).with_context(|| format!("Unknown sound '{}'", name))?,
        None => get_default_sound(),
    };
    let primary = if args.no_sound {
        None
    } else {
        try_create_player().map(|player| player as Arc<dyn SoundPlayer>)
    };

    let permission = if args.no_notify {
        Permission::Denied
    } else {
        Permission::Granted
    };

    let wake_lock: Arc<dyn WakeLock> = if args.keep_awake {
        if !inhibitor_available() {
            warn!("No wake lock helper found; the display may still sleep");
        }
        Arc::new(InhibitorWakeLock::new())
    } else {
        Arc::new(NoopWakeLock)
    };

    let capabilities = Capabilities {
        alerter: Alerter::new(primary, Arc::new(BellPlayer::new()), source),
        notifier: Arc::new(DesktopNotifier::new(permission)),
        wake_lock,
    };

    let display = Arc::new(TerminalDisplay::stdout());
    let controller = Controller::new(
        Arc::new(store),
        SystemClock,
        IntervalScheduler::default(),
        display.clone(),
        capabilities,
    );

    let mut session = Session::new(controller, display);
    let input = StdinLines::spawn().context("Failed to start the input reader")?;
    session.run(input).await?;
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
