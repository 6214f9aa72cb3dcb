// ABOUTME: Demo entry point - mounts a controller, publishes a snackbar and prints its lifecycle

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

use snackbar_box::channel::{self, show_snack_bar_to};
use snackbar_box::gesture::TouchTarget;
use snackbar_box::{
    ConfirmCallback, ControllerConfig, Position, SnackbarController, SnackbarHandle,
    SnackbarRequest,
};

#[derive(Debug, Parser)]
#[command(name = "snackbar-box", about = "Drive a snackbar controller from the terminal")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print every view change as a JSON line
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct ShowArgs {
    message: String,

    /// Hold time in milliseconds
    #[arg(long)]
    duration: Option<u64>,

    /// Enter/exit animation time in milliseconds
    #[arg(long)]
    animation_time: Option<u64>,

    #[arg(long, value_enum)]
    position: Option<Position>,

    #[arg(long)]
    height: Option<f64>,
}

impl ShowArgs {
    /// Upper bound on how long the snackbar can stay up, with slack for slow terminals.
    fn lifetime_bound(&self, config: &ControllerConfig) -> Duration {
        let hold = self.duration.map_or_else(|| config.duration(), Duration::from_millis);
        let animation = self
            .animation_time
            .map_or_else(|| config.animation_time(), Duration::from_millis);
        hold + animation * 2 + Duration::from_secs(30)
    }

    fn request(&self) -> SnackbarRequest {
        let mut request = SnackbarRequest::new(self.message.clone());
        request.duration = self.duration.map(Duration::from_millis);
        request.animation_time = self.animation_time.map(Duration::from_millis);
        request.position = self.position;
        request.height = self.height;
        request
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a snackbar and let it time out
    Show(ShowArgs),
    /// Show a snackbar with a button and press it
    Confirm {
        #[command(flatten)]
        show: ShowArgs,

        #[arg(long, default_value = "OK")]
        label: String,

        /// Milliseconds after showing before the button is pressed
        #[arg(long, default_value_t = 500)]
        press_after: u64,
    },
    /// Show a snackbar and swipe it sideways
    Swipe {
        #[command(flatten)]
        show: ShowArgs,

        /// Horizontal distance in pixels (negative swipes left)
        #[arg(long, default_value_t = 250.0, allow_negative_numbers = true)]
        distance: f64,

        /// Milliseconds after showing before the swipe starts
        #[arg(long, default_value_t = 500)]
        swipe_after: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ControllerConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ControllerConfig::load(),
    };

    let handle = SnackbarController::mount(config.clone(), channel::global());
    let printer = tokio::spawn(print_lifecycle(handle.watch(), cli.json));

    let limit = match cli.command {
        Command::Show(show) => {
            show_snack_bar_to(&config.id, show.request());
            show.lifetime_bound(&config)
        }
        Command::Confirm {
            show,
            label,
            press_after,
        } => {
            let on_confirm = ConfirmCallback::new(|| println!("confirm callback invoked"));
            show_snack_bar_to(&config.id, show.request().with_confirm(label, on_confirm));
            sleep(Duration::from_millis(press_after)).await;
            handle.press_confirm()?;
            show.lifetime_bound(&config)
        }
        Command::Swipe {
            show,
            distance,
            swipe_after,
        } => {
            show_snack_bar_to(&config.id, show.request());
            sleep(Duration::from_millis(swipe_after)).await;
            swipe(&handle, distance).await?;
            show.lifetime_bound(&config)
        }
    };

    timeout(limit, wait_until_idle(&handle))
        .await
        .context("snackbar never returned to idle")?;

    handle.dispose().await;
    let _ = printer.await;
    channel::global().clear();
    Ok(())
}

async fn swipe(handle: &SnackbarHandle, distance: f64) -> Result<()> {
    const STEPS: u32 = 10;
    handle.touch_start(TouchTarget::Body)?;
    for step in 1..=STEPS {
        sleep(Duration::from_millis(16)).await;
        handle.drag_move(distance * f64::from(step) / f64::from(STEPS))?;
    }
    handle.touch_end()?;
    Ok(())
}

async fn wait_until_idle(handle: &SnackbarHandle) {
    let mut rx = handle.watch();
    let mut seen_active = false;
    loop {
        if rx.borrow_and_update().is_visible() {
            seen_active = true;
        } else if seen_active {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

async fn print_lifecycle(
    mut rx: tokio::sync::watch::Receiver<snackbar_box::SnackbarView>,
    json: bool,
) {
    let start = Instant::now();
    while rx.changed().await.is_ok() {
        let view = rx.borrow_and_update().clone();
        let elapsed = start.elapsed().as_millis();
        if json {
            match serde_json::to_string(&view) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("Failed to encode view: {}", e),
            }
        } else {
            println!(
                "{:>6}ms  {:<10} {}{}",
                elapsed,
                format!("{:?}", view.phase),
                view.message.as_deref().unwrap_or(""),
                view.confirm_label
                    .map(|label| format!("  [{label}]"))
                    .unwrap_or_default()
            );
        }
    }
}

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snackbar_box=info".into()),
        )
        .init();
}
