//! ---
//! hems_section: "05-operator-interfaces"
//! hems_subsection: "binary"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Operator CLI for inspecting and simulating the household dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use hems_common::config::{AppConfig, LoadedAppConfig};
use hems_common::logging::init_tracing;
use hems_engine::{
    fleet::DEFAULT_HOUSEHOLD, io::load_devices_from_file, DeviceFilter, DeviceFleet, DeviceStatus,
    NewDevice, NotificationCenter, NotificationKind, RefreshSimulator,
};
use hems_logging::{hems_info, hems_warn, LogContext};

mod render;

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["hems.toml", "config/hems.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "HEMS household energy dashboard utility",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print version information and exit"
    )]
    version: bool,

    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Load devices from a JSON or YAML file instead of the sample household"
    )]
    devices: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Totals, costs and alerts for the household")]
    Summary,
    #[command(about = "List devices, optionally filtered")]
    Devices(DevicesArgs),
    #[command(about = "Per-device cost breakdown, largest consumers first")]
    Costs,
    #[command(about = "Run simulated refresh ticks, then print the summary")]
    Refresh(RefreshArgs),
    #[command(about = "Add a device and print it")]
    Add(AddArgs),
    #[command(about = "Write the metrics report as JSON")]
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct DevicesArgs {
    /// Case-insensitive match against device name or location.
    #[arg(long, default_value = "")]
    search: String,
    /// Exact device type.
    #[arg(long = "type", value_name = "TYPE")]
    device_type: Option<String>,
    /// Exact location.
    #[arg(long, value_name = "LOCATION")]
    location: Option<String>,
}

#[derive(Debug, Args)]
struct RefreshArgs {
    #[arg(long, default_value_t = 1)]
    ticks: u32,
    /// Override the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_name = "TYPE")]
    device_type: String,
    #[arg(long)]
    location: String,
    /// Instantaneous draw in watts.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    current_power: f64,
    /// Baseline draw in watts.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    average_power: f64,
    /// online, offline or standby.
    #[arg(long, default_value = "online")]
    status: DeviceStatus,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[arg(long, value_name = "DIR", default_value = "reports")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("hemsctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let LoadedAppConfig { config, source } = load_config(cli.config.as_ref())?;
    if init_tracing("hemsctl", &config.logging).is_err() {
        hems_logging::init();
    }
    if let Some(path) = &source {
        tracing::debug!(config = %path.display(), "configuration loaded");
    }

    let mut fleet = load_fleet(cli.devices.as_ref(), &config)?;
    let mut notifications = NotificationCenter::from_config(&config.notifications);
    let currency = config.pricing.currency_symbol.as_str();
    let cost = config.pricing.cost_per_unit;

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => render::summary(&fleet.metrics(cost), currency),
        Commands::Devices(args) => {
            let mut filter = DeviceFilter::new(args.search);
            filter.device_type = args.device_type;
            filter.location = args.location;
            render::device_table(&fleet.filter(&filter), cost, currency);
        }
        Commands::Costs => render::cost_breakdown(&fleet.metrics(cost), currency),
        Commands::Refresh(args) => {
            let mut simulation = config.simulation.clone();
            if args.seed.is_some() {
                simulation.seed = args.seed;
            }
            let mut simulator = RefreshSimulator::new(&simulation, &config.detection);
            for tick in 1..=u64::from(args.ticks) {
                let report = fleet.refresh_simulate(&mut simulator);
                let ctx = LogContext::new()
                    .with_household(fleet.household())
                    .with_tick(tick)
                    .with_mode("simulation");
                hems_info!(context = ctx, "refreshed {} devices", report.refreshed);
                for id in &report.anomalies_raised {
                    hems_warn!(context = ctx.clone().with_device(id), "consumption above baseline");
                    if let Some(device) = fleet.get(id) {
                        notifications.notify(
                            NotificationKind::Warning,
                            "Anomaly detected",
                            Some(format!("{} ({})", device.name, device.location)),
                            Utc::now(),
                        );
                    }
                }
                for id in &report.phantom_raised {
                    hems_warn!(context = ctx.clone().with_device(id), "phantom load on standby");
                    if let Some(device) = fleet.get(id) {
                        notifications.notify(
                            NotificationKind::Warning,
                            "Phantom load",
                            Some(format!("{} draws power on standby", device.name)),
                            Utc::now(),
                        );
                    }
                }
            }
            render::summary(&fleet.metrics(cost), currency);
            render::notifications(notifications.visible());
        }
        Commands::Add(args) => {
            let input = NewDevice::new(args.name, args.device_type, args.location)
                .with_power(args.current_power, args.average_power)
                .with_status(args.status);
            let device = fleet.add_device(input).context("device rejected")?.clone();
            notifications.notify(
                NotificationKind::Success,
                "Device added",
                Some(format!("{} added to {}", device.name, device.location)),
                Utc::now(),
            );
            if device.has_phantom_load {
                notifications.notify(
                    NotificationKind::Warning,
                    "Phantom load",
                    Some(format!("{} draws power on standby", device.name)),
                    Utc::now(),
                );
            }
            render::device_detail(&device, cost, currency);
            render::notifications(notifications.visible());
        }
        Commands::Export(args) => {
            let path = fleet
                .metrics(cost)
                .exporter()
                .export(&args.out)
                .with_context(|| format!("failed to export report to {}", args.out.display()))?;
            println!("Report written to {}", path.display());
        }
    }
    Ok(())
}

fn load_config(explicit: Option<&PathBuf>) -> Result<LoadedAppConfig> {
    match explicit {
        Some(path) => Ok(LoadedAppConfig {
            config: AppConfig::from_path(path)?,
            source: Some(path.clone()),
        }),
        None => AppConfig::load_with_source(&DEFAULT_CONFIG_CANDIDATES),
    }
}

fn load_fleet(devices: Option<&PathBuf>, config: &AppConfig) -> Result<DeviceFleet> {
    let fleet = match devices {
        Some(path) => {
            let devices = load_devices_from_file(path)
                .with_context(|| format!("unable to load devices from {}", path.display()))?;
            let household = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_HOUSEHOLD.to_owned());
            DeviceFleet::new(devices)
                .with_context(|| format!("invalid device file {}", path.display()))?
                .with_household(household)
        }
        None => DeviceFleet::seeded(),
    };
    Ok(fleet.with_phantom_threshold(config.detection.phantom_threshold_w))
}
