//! Reference daemon wiring for the audiovisor supervisor.
//!
//! Flag parsing, logging setup, and settings bootstrapping live here, outside
//! the supervision core. The built-in actors registered below are
//! deliberately minimal: they exist so the daemon runs end to end, and to
//! show where real subsystem implementations plug in.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use async_trait::async_trait;
use clap::{ArgAction, Parser};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

use audiovisor::{Actor, ActorCatalog, ActorError, BoxedActor, Settings, Supervisor};

/// File name of the optional on-disk debug log.
const DEBUG_LOG_FILE: &str = "audiovisor.log";

#[derive(Parser, Debug)]
#[command(name = "audiovisor", version, about = "Lifecycle supervisor for audio service subsystems")]
struct Options {
    /// Path to the settings file (created with defaults when missing)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Less output (warning level)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Also write a debug-level log to ./audiovisor.log
    #[arg(long)]
    save_debug_log: bool,

    /// Print the effective settings and exit
    #[arg(long)]
    list_settings: bool,
}

impl Options {
    /// Console log level, derived once and immutable for the process.
    fn console_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::WARN;
        }
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Sets up the stderr logger and, when requested, the debug log file.
///
/// The returned guard keeps the non-blocking file writer alive; drop it only
/// at process exit.
fn init_logging(opts: &Options) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(opts.console_level().into())
        .from_env_lossy();
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let mut guard = None;
    let file = if opts.save_debug_log {
        let appender = tracing_appender::rolling::never(".", DEBUG_LOG_FILE);
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        )
    } else {
        None
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

// ---- Built-in reference actors ----

/// Audio engine placeholder; a real engine owns the playback pipeline.
struct NullAudio;

#[async_trait]
impl Actor for NullAudio {
    fn name(&self) -> &str {
        "audio"
    }

    async fn start(&mut self) -> Result<(), ActorError> {
        debug!("audio engine up (null output)");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ActorError> {
        debug!("audio engine down");
        Ok(())
    }

    fn describe(&self) -> String {
        "audio: null output sink".to_string()
    }
}

/// Backend placeholder serving an empty local library.
struct LocalBackend;

#[async_trait]
impl Actor for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn start(&mut self) -> Result<(), ActorError> {
        debug!("local backend up (empty library)");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ActorError> {
        debug!("local backend down");
        Ok(())
    }

    fn describe(&self) -> String {
        "local: 0 tracks indexed".to_string()
    }
}

/// Frontend placeholder that logs a heartbeat while running.
struct StatusFrontend {
    ticker: Option<tokio::task::JoinHandle<()>>,
}

#[async_trait]
impl Actor for StatusFrontend {
    fn name(&self) -> &str {
        "mpd"
    }

    async fn start(&mut self) -> Result<(), ActorError> {
        self.ticker = Some(tokio::spawn(async {
            let mut tick = tokio::time::interval(Duration::from_secs(60));
            tick.tick().await;
            loop {
                tick.tick().await;
                debug!("mpd frontend idle");
            }
        }));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ActorError> {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.ticker {
            Some(_) => "mpd: idle, no clients".to_string(),
            None => "mpd: not started".to_string(),
        }
    }
}

/// Scrobbler frontend; without an API key it declines to start with the
/// optional-dependency marker and the daemon runs degraded.
struct ScrobblerFrontend;

#[async_trait]
impl Actor for ScrobblerFrontend {
    fn name(&self) -> &str {
        "scrobbler"
    }

    async fn start(&mut self) -> Result<(), ActorError> {
        match std::env::var("AUDIOVISOR_SCROBBLER_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                debug!("scrobbler up");
                Ok(())
            }
            _ => Err(ActorError::optional(
                "AUDIOVISOR_SCROBBLER_KEY is not set",
            )),
        }
    }

    async fn stop(&mut self) -> Result<(), ActorError> {
        Ok(())
    }
}

fn builtin_catalog() -> ActorCatalog {
    let mut catalog = ActorCatalog::new();
    catalog.register("audio", || Box::new(NullAudio) as BoxedActor);
    catalog.register("local", || Box::new(LocalBackend) as BoxedActor);
    catalog.register("mpd", || Box::new(StatusFrontend { ticker: None }) as BoxedActor);
    catalog.register("scrobbler", || Box::new(ScrobblerFrontend) as BoxedActor);
    catalog
}

#[tokio::main]
async fn main() -> ExitCode {
    let opts = Options::parse();
    let _log_guard = init_logging(&opts);

    let path = opts.config.clone().unwrap_or_else(Settings::default_path);
    let settings = match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if opts.list_settings {
        print!("{}", settings.to_toml());
        return ExitCode::SUCCESS;
    }

    info!(settings = %path.display(), "starting audiovisor");
    let mut supervisor = Supervisor::new(builtin_catalog());
    match supervisor.run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Configuration errors get one line and a non-zero exit; every
            // other failure was already handled inside run() with a full
            // teardown and exits 0.
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
