//! unit-reconciler - Reconcile a systemd unit's run-state with desired flags.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use unit_reconciler::config::Settings;
use unit_reconciler::error::ReconcileError;
use unit_reconciler::reconciler::{DesiredState, Reconciler};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

const DEFAULT_CONFIG_PATH: &str = "/etc/unit-reconciler/config.toml";

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    // Load configuration; the default path is optional, an explicit one is not
    let settings = match load_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    let reconciler = Reconciler::from_config(settings.systemctl.clone());

    if args.iter().any(|a| a == "--daemon-reload") {
        return match reconciler.daemon_reload() {
            Ok(()) => {
                info!("Manager configuration reloaded");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "daemon-reload failed");
                ExitCode::FAILURE
            }
        };
    }

    let unit = match positional_unit(&args) {
        Some(unit) => unit,
        None => {
            eprintln!("Error: no unit name given (try --help)");
            return ExitCode::FAILURE;
        }
    };

    if args.iter().any(|a| a == "--status") {
        return print_status(&reconciler, &unit);
    }

    let desired = DesiredState {
        start: args.iter().any(|a| a == "--start"),
        stop: args.iter().any(|a| a == "--stop"),
        enable: args.iter().any(|a| a == "--enable"),
        disable: args.iter().any(|a| a == "--disable"),
    };

    let outcome = reconciler.apply(&unit, &desired);
    let executed: Vec<String> = outcome.executed.iter().map(|c| c.to_string()).collect();

    match outcome.error {
        None => {
            println!(
                "{}",
                serde_json::json!({
                    "unit": unit,
                    "executed": executed,
                    "success": true,
                })
            );
            ExitCode::SUCCESS
        }
        Some(e) => {
            error!(unit = %unit, error = %e, "Reconciliation failed");
            println!(
                "{}",
                serde_json::json!({
                    "unit": unit,
                    "executed": executed,
                    "success": false,
                    "error": e.to_string(),
                })
            );
            ExitCode::FAILURE
        }
    }
}

/// Run the three observer queries and print the observed state as JSON.
fn print_status(reconciler: &Reconciler, unit: &str) -> ExitCode {
    let observer = reconciler.observer();
    let state = observer.exists(unit).and_then(|exists| {
        let active = observer.is_active(unit)?;
        let enabled = observer.is_enabled(unit)?;
        Ok((exists, active, enabled))
    });

    match state {
        Ok((exists, active, enabled)) => {
            println!(
                "{}",
                serde_json::json!({
                    "unit": unit,
                    "exists": exists,
                    "active": active,
                    "enabled": enabled,
                })
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(unit = %unit, error = %e, "Status query failed");
            ExitCode::FAILURE
        }
    }
}

/// Load settings from --config, the default path, or built-in defaults.
fn load_settings(args: &[String]) -> Result<Settings, ReconcileError> {
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if let Some(path) = args.get(pos + 1) {
            return Settings::load(path);
        }
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return Settings::load(DEFAULT_CONFIG_PATH);
    }
    Ok(Settings::default())
}

/// First argument that is not a flag or a flag value.
fn positional_unit(args: &[String]) -> Option<String> {
    let mut skip_next = false;
    for arg in args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--config" {
            skip_next = true;
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return Some(arg.clone());
    }
    None
}

/// Initialize logging based on configuration.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()?;
    }
    Ok(())
}

fn print_help() {
    println!("{} {} - reconcile a systemd unit's run-state", NAME, VERSION);
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <unit>", NAME);
    println!("    {} --daemon-reload", NAME);
    println!();
    println!("OPTIONS:");
    println!("    --start            Unit should be running");
    println!("    --stop             Unit should not be running");
    println!("    --enable           Unit should start at boot");
    println!("    --disable          Unit should not start at boot");
    println!("    --status           Print observed state and exit");
    println!("    --daemon-reload    Re-read unit definitions from disk");
    println!("    --config <path>    Configuration file (TOML)");
    println!("    -h, --help         Print help");
    println!("    -V, --version      Print version");
}
