//! sqlsh CLI entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sqlsh_driver::DriverRegistry;
use sqlsh_foundation::Result;
use sqlsh_runtime::{Repl, Session, ShellConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "SQLSH_LOG";

/// Interactive shell for driver-backed databases.
#[derive(Parser, Debug)]
#[command(name = "sqlsh", version, about)]
struct Cli {
    /// Read and execute statements from FILE before reading the terminal.
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Load settings from FILE instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level and print error context.
    #[arg(long)]
    debug: bool,

    /// DRIVER_URL [USER [PASSWORD]]
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let registry = DriverRegistry::with_defaults();
    if !(1..=3).contains(&cli.args.len()) {
        print_usage(&registry);
        return ExitCode::FAILURE;
    }

    match run(&cli, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_usage(registry: &DriverRegistry) {
    println!();
    println!("USAGE: sqlsh [--file file] driver_url [user [password] ]");
    println!();
    println!("Available driver and datasources:");
    println!();
    for driver in registry.available_drivers() {
        println!("{driver}");
        match registry.data_sources(driver) {
            Ok(sources) => {
                for source in sources {
                    println!("  {source}");
                }
            }
            Err(e) => debug!(driver, error = %e, "could not list data sources"),
        }
        println!();
    }
    println!();
}

fn run(cli: &Cli, registry: &DriverRegistry) -> Result<()> {
    let config = ShellConfig::load(cli.config.as_deref())?;
    let config = if cli.debug {
        config.with_debug(true)
    } else {
        config
    };

    let url = cli.args[0].as_str();
    let user = cli.args.get(1).map(String::as_str);
    let password = cli.args.get(2).map(String::as_str);

    println!();
    let connection = registry.connect(url, user, password)?;
    let mut banner = format!("CONNECT TO {url}");
    if let Some(user) = user {
        banner.push_str(&format!(" USER {user}"));
    }
    if let Some(password) = password {
        banner.push_str(&format!(" PASS {password}"));
    }
    println!("{banner}");
    println!();

    let mut repl = Repl::new(Session::new(connection), &config)?;
    if let Some(file) = &cli.file {
        repl.redirect_input(file)?;
    }
    repl.run()
}
