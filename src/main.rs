//! rene - a Pomodoro timer you drive from the terminal
//!
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use rene::cli::{Cli, Commands, DaemonArgs, Display, IpcClient};
use rene::config::DaemonConfig;
use rene::daemon;
use rene::sound::{NotificationSound, SoundWorker};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
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
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Start => {
            let response = client(cli.socket)?.start().await?;
            Display::show_command_result(&response);
        }
        Commands::Pause => {
            let response = client(cli.socket)?.pause().await?;
            Display::show_command_result(&response);
        }
        Commands::Toggle => {
            let response = client(cli.socket)?.toggle().await?;
            Display::show_command_result(&response);
        }
        Commands::Reset => {
            let response = client(cli.socket)?.reset().await?;
            Display::show_command_result(&response);
        }
        Commands::Mode { mode } => {
            let response = client(cli.socket)?.switch_mode(mode.into()).await?;
            Display::show_command_result(&response);
        }
        Commands::Status => {
            let response = client(cli.socket)?.status().await?;
            Display::show_status(&response);
        }
        Commands::Track(args) => {
            let response = client(cli.socket)?.track_change(args.into_track()).await?;
            Display::show_track_result(&response);
        }
        Commands::Daemon(args) => {
            run_daemon(cli.socket, args).await?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn client(socket: Option<PathBuf>) -> Result<IpcClient> {
    match socket {
        Some(path) => Ok(IpcClient::with_socket_path(path)),
        None => IpcClient::new(),
    }
}

/// Loads the config and runs the daemon in the foreground.
async fn run_daemon(socket: Option<PathBuf>, args: DaemonArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DaemonConfig::load(path)?,
        None => DaemonConfig::load_default()?,
    };

    let socket_path = match socket {
        Some(path) => path,
        None => config.resolved_socket_path()?,
    };

    let sound: Arc<dyn NotificationSound> = if args.no_sound || !config.sound.enabled {
        tracing::info!("Completion sound disabled");
        Arc::new(SoundWorker::disabled())
    } else {
        Arc::new(SoundWorker::rodio(config.sound.to_source()))
    };

    daemon::run(&socket_path, sound).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
