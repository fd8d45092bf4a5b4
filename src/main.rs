//! sidebar-dock - reserve desktop space for docked sidebar panels
//!
//! Command line front end over the dock coordinator. Useful for checking
//! what the reservation mechanism does on a machine without the sidebar UI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use sidebar_dock::config::{default_config_path, ConfigStore, ConfigStoreConfig, SidebarConfig};
use sidebar_dock::core::{DockSide, PanelId, WindowHandle};
use sidebar_dock::dock::DockCoordinator;
use sidebar_dock::logging::{LogLevel, LoggingSystem};
use sidebar_dock::os::{ApplyOptions, SimulatedDesktop};
use sidebar_dock::reservation::{apply_options, WorkareaReservation};

#[derive(Parser)]
#[command(name = "sidebar-dock", version, about = "Reserve desktop space for sidebar panels")]
struct Cli {
    /// Use an in-memory 1920x1040 desktop instead of the real one.
    #[arg(long, global = true)]
    simulate: bool,

    /// Path to config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Window handle to register when the AppBar mechanism is configured.
    #[arg(long, global = true, value_parser = parse_handle)]
    hwnd: Option<WindowHandle>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the reservation status as JSON.
    Status,
    /// Reserve space until Ctrl+C or the hold time runs out, then restore.
    Reserve {
        #[arg(long, value_enum, default_value = "notebook")]
        panel: PanelArg,
        /// Override the panel's configured side.
        #[arg(long, value_enum)]
        side: Option<SideArg>,
        /// Override the panel's configured width in pixels.
        #[arg(long)]
        width: Option<u32>,
        /// Release after this many seconds instead of waiting for Ctrl+C.
        #[arg(long)]
        hold_secs: Option<u64>,
        /// Reserve even when reservation is disabled in config.
        #[arg(long)]
        force: bool,
    },
    /// Put back the work area recorded by a reserve run that never restored it.
    Restore,
    /// Turn reservation on in config.
    Enable,
    /// Turn reservation off in config.
    Disable,
    /// Print the config file location.
    ConfigPath,
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelArg {
    Notebook,
    Browser,
}

impl From<PanelArg> for PanelId {
    fn from(value: PanelArg) -> Self {
        match value {
            PanelArg::Notebook => PanelId::Notebook,
            PanelArg::Browser => PanelId::Browser,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for DockSide {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Left => DockSide::Left,
            SideArg::Right => DockSide::Right,
        }
    }
}

fn parse_handle(raw: &str) -> std::result::Result<WindowHandle, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => raw.parse::<usize>(),
    };
    parsed
        .map(WindowHandle)
        .map_err(|e| format!("invalid window handle {raw:?}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    if let Command::ConfigPath = cli.command {
        println!("{}", config_path.display());
        return Ok(());
    }

    let store = ConfigStore::new(ConfigStoreConfig::at(&config_path))
        .await
        .with_context(|| format!("failed to open config at {}", config_path.display()))?;
    let config = store.get().await;

    let _logging = init_logging(&config, cli.verbose);

    match cli.command {
        Command::Enable => {
            store.set_reservation_enabled(true).await?;
            println!("Reservation enabled");
        }
        Command::Disable => {
            store.set_reservation_enabled(false).await?;
            println!("Reservation disabled");
        }
        Command::Status => {
            let coordinator = build_coordinator(&config, cli.simulate, cli.hwnd)?;
            // Degraded status is still worth printing
            if let Err(e) = coordinator.initialize() {
                tracing::warn!("Initialization failed: {}", e);
            }
            println!("{}", serde_json::to_string_pretty(&coordinator.status())?);
        }
        Command::Restore => match config.saved_baseline {
            Some(baseline) if !cli.simulate => {
                let coordinator = build_coordinator(&config, cli.simulate, cli.hwnd)?;
                if coordinator.recover(baseline)? {
                    println!("Work area restored to {}", baseline);
                } else {
                    println!("Work area already at {}", baseline);
                }
                store.record_baseline(None).await?;
            }
            _ => println!("Nothing to restore"),
        },
        Command::Reserve {
            panel,
            side,
            width,
            hold_secs,
            force,
        } => {
            let mut config = config;
            config.reservation.enabled |= force;
            let coordinator = build_coordinator(&config, cli.simulate, cli.hwnd)?;
            // A reservation left behind by a killed run must not become the baseline
            let saved = config.saved_baseline.filter(|_| !cli.simulate);
            let baseline = match saved {
                Some(saved) => {
                    coordinator.recover(saved)?;
                    saved
                }
                None => coordinator.initialize()?,
            };

            let panel = PanelId::from(panel);
            let layout = *config.reservation.panels.get(panel);
            let side = side.map(DockSide::from).unwrap_or(layout.side);
            let width = width.unwrap_or(layout.width_px);

            let mut lease = coordinator
                .acquire_with(panel, side, width)
                .context("failed to reserve desktop space")?;
            if !cli.simulate {
                store.record_baseline(Some(baseline)).await?;
            }
            println!(
                "Reserved {}px on the {} for {} (baseline {})",
                config.reservation.clamp_width(width),
                side,
                panel,
                baseline
            );

            hold(hold_secs).await;

            lease.release()?;
            coordinator.shutdown()?;
            if !cli.simulate {
                store.record_baseline(None).await?;
            }
            println!("Work area restored to {}", baseline);
        }
        Command::ConfigPath => {}
    }

    Ok(())
}

fn init_logging(config: &SidebarConfig, verbose: bool) -> Option<LoggingSystem> {
    let mut logging_config = config.logging.clone();
    if verbose {
        logging_config = logging_config.with_level(LogLevel::Debug);
    }

    match LoggingSystem::init(logging_config) {
        Ok(system) => Some(system),
        Err(e) => {
            // Fall back to basic logging if the configured setup fails
            eprintln!("Failed to initialize logging system: {}. Using basic logging.", e);
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .try_init();
            None
        }
    }
}

fn build_coordinator(
    config: &SidebarConfig,
    simulate: bool,
    hwnd: Option<WindowHandle>,
) -> Result<DockCoordinator> {
    if simulate {
        let options: ApplyOptions = apply_options(&config.reservation);
        let reserver = WorkareaReservation::new(SimulatedDesktop::full_hd(), options);
        return Ok(DockCoordinator::new(
            Box::new(reserver),
            config.reservation.clone(),
        ));
    }

    DockCoordinator::for_platform(config.reservation.clone(), hwnd)
        .context("failed to set up desktop space reservation")
}

async fn hold(hold_secs: Option<u64>) {
    match hold_secs {
        Some(secs) => {
            println!("Holding for {secs}s, Ctrl+C to release early");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            }
        }
        None => {
            println!("Holding until Ctrl+C");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to wait for Ctrl+C, releasing now: {}", e);
            }
        }
    }
}
