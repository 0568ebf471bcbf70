//! Pomodorik CLI - a single-countdown focus timer
//!
//! Runs one countdown at a time in the foreground:
//! - Focus sessions (20 minutes by default)
//! - Short breaks (5 minutes) and long breaks (10 minutes)
//! - Starting a session while one runs replaces it

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use pomodorik::cli::{Cli, Commands, Display, KeyCommand, StartArgs};
use pomodorik::config::AppConfig;
use pomodorik::indicator::{TitleRenderer, TrayIndicator};
use pomodorik::inhibit::IdleInhibitor;
use pomodorik::session::{EventForwarder, ObserverSet, SessionController, SessionError, SessionEvent};
use pomodorik::sound::{try_create_player, SoundAlert};
use pomodorik::types::{DurationTable, SessionKind, SessionPhase};
use pomodorik::ConfigError;

/// Longest wait for a completion alert before the process exits.
const ALERT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

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
        if let Some(suggestion) = suggestion_for(&e) {
            Display::show_suggestion(suggestion);
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the countdown line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Finds a user-facing hint for the root cause, if it has one.
fn suggestion_for(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<SessionError>().map(SessionError::suggestion)
        }
    })
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Start(args)) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            run_start(args, config).await?;
        }
        Some(Commands::Durations { json }) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            show_durations(&config.durations, json)?;
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

fn show_durations(durations: &DurationTable, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(durations).context("Failed to encode durations")?;
        println!("{}", out);
    } else {
        Display::show_durations(durations);
    }
    Ok(())
}

/// Runs the foreground countdown until the user quits.
async fn run_start(args: StartArgs, config: AppConfig) -> Result<()> {
    let display = Display::new(io::stdout().is_terminal());

    let (forwarder, mut events) = EventForwarder::channel();
    let (indicator, updates) = TrayIndicator::channel();
    let mut observers = ObserverSet::new()
        .with(Arc::new(forwarder))
        .with(Arc::new(indicator));

    let mut alert = None;
    if config.sound.enabled && !args.no_sound {
        if let Some(player) = try_create_player(config.sound.volume) {
            let sound_alert = Arc::new(SoundAlert::new(player, config.sound.source()));
            observers.push(sound_alert.clone());
            alert = Some(sound_alert);
        }
    }
    if config.inhibit.enabled && !args.no_inhibit {
        observers.push(Arc::new(IdleInhibitor::from_config(&config.inhibit)));
    }
    tracing::debug!(?observers, "Session observers ready");

    let controller = SessionController::new(Arc::new(observers));

    // Terminal title escapes only make sense on a terminal.
    let title_writer: Box<dyn Write> = if display.is_interactive() {
        Box::new(io::stdout())
    } else {
        Box::new(io::sink())
    };
    let mut renderer = TitleRenderer::new(updates, title_writer);

    let mut current = args.kind;
    let first_seconds = args.first_duration(&config.durations);
    start_session(&controller, &display, current, first_seconds)?;
    if display.is_interactive() {
        display.show_key_help();
    }

    let mut lines = spawn_input_reader()?;
    let mut stdin_open = true;
    let mut exit_after_session = args.once;

    loop {
        tokio::select! {
            line = lines.recv(), if stdin_open => match line {
                Some(line) => match KeyCommand::parse(&line) {
                    Some(KeyCommand::Start(kind)) => {
                        show_pending_events(&display, current, &mut events);
                        current = kind;
                        let seconds = config.durations.seconds_for(kind);
                        start_session(&controller, &display, kind, seconds)?;
                    }
                    Some(KeyCommand::Cancel) => {
                        if !controller.cancel_session() {
                            display.show_idle();
                        }
                    }
                    Some(KeyCommand::Quit) => break,
                    None => display.show_key_help(),
                },
                None => {
                    tracing::debug!("Input closed");
                    stdin_open = false;
                    if !controller.snapshot().phase.is_running() {
                        break;
                    }
                    exit_after_session = true;
                }
            },
            Some(event) = events.recv() => {
                show_event(&display, current, event);
                renderer.drain().context("Failed to update terminal title")?;
                if event.is_terminal() && exit_after_session {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted");
                break;
            }
        }
    }

    let final_phase = controller.snapshot().phase;
    controller.cancel_session();
    renderer.drain().context("Failed to update terminal title")?;
    if display.is_interactive() {
        renderer.reset().context("Failed to reset terminal title")?;
    }
    finish_alert(alert, final_phase).await;
    Ok(())
}

fn show_event(display: &Display, kind: SessionKind, event: SessionEvent) {
    match event {
        SessionEvent::RemainingChanged { remaining_seconds } => {
            display.show_remaining(kind, remaining_seconds);
        }
        SessionEvent::Completed => display.show_completed(kind),
        SessionEvent::Cancelled => display.show_cancelled(kind),
        SessionEvent::Started => {}
    }
}

/// Shows events still queued from the session labelled `kind`.
///
/// Returns how many were shown.
fn show_pending_events(
    display: &Display,
    kind: SessionKind,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
) -> usize {
    let mut shown = 0;
    while let Ok(event) = events.try_recv() {
        show_event(display, kind, event);
        shown += 1;
    }
    shown
}

/// Lets the completion alert play out before the process exits.
///
/// The audio thread is not joined on exit, so returning early would cut
/// the alert off. Nothing is awaited unless the last session completed.
async fn finish_alert(alert: Option<Arc<SoundAlert>>, phase: SessionPhase) -> bool {
    let Some(alert) = alert else {
        return false;
    };
    if phase != SessionPhase::Completed {
        return false;
    }

    let finished =
        tokio::task::spawn_blocking(move || alert.wait_for_playback(ALERT_FLUSH_TIMEOUT))
            .await
            .unwrap_or(false);
    if !finished {
        tracing::debug!("Completion alert still playing at exit");
    }
    true
}

/// Reads stdin lines on a dedicated thread.
///
/// A blocking read pending on a runtime worker would keep the runtime from
/// shutting down, so input never goes through tokio's stdin. The channel
/// closes on EOF or a read error.
fn spawn_input_reader() -> Result<mpsc::UnboundedReceiver<String>> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("pomodorik-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
        })
        .context("Failed to start input thread")?;
    Ok(line_rx)
}

fn start_session(
    controller: &SessionController,
    display: &Display,
    kind: SessionKind,
    seconds: u32,
) -> Result<()> {
    controller
        .start_session(seconds)
        .with_context(|| format!("Failed to start {} session", kind.key()))?;
    display.show_started(kind, seconds);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
