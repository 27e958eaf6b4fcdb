//! # reedcfg demo application
//!
//! Two pretend components, a web server and a mailer, each declare their own
//! namespace against one shared registry.
//!
//! ## Running
//!
//! ```sh
//! CONFIG_LOCATION=demos/reedcfg_demo/demo.ini cargo run --example reedcfg_demo -- show
//! CONFIG_LOCATION=demos/reedcfg_demo/demo.ini APP_ENVIRONMENT=prod cargo run --example reedcfg_demo -- show
//! CONFIG_LOCATION=demos/reedcfg_demo/demo.ini cargo run --example reedcfg_demo -- config list
//! CONFIG_LOCATION=demos/reedcfg_demo/demo.ini cargo run --example reedcfg_demo -- config get server.port
//! ```
//!
//! Point `CONFIG_LOCATION` somewhere that does not exist and every field
//! falls back to its default.

use std::net::IpAddr;

use clap::{Parser, Subcommand};

use reedcfg::diagnostics::{self, DiagnosticsConfig};
use reedcfg::{Config, ConfigArgs, ConfigError, Environment, NameSpace, TypeTag, Value};

/// reedcfg demo: a sample CLI app for showcasing namespaced configuration.
#[derive(Parser, Debug)]
#[command(name = "reedcfg-demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print what each component resolved.
    Show,
    /// Inspect the resolved configuration (list, get).
    Config(ConfigArgs),
}

fn server_namespace() -> Result<NameSpace, ConfigError> {
    let mut ns = NameSpace::new("server")?;
    ns.add_entry("bind", TypeTag::of::<IpAddr>(), Value::custom(IpAddr::from([127, 0, 0, 1])))?;
    ns.add_entry("port", TypeTag::Int, 8080)?;
    ns.add_entry("workers", TypeTag::Int, 4)?;
    ns.add_entry("debug", TypeTag::Bool, false)?;
    Ok(ns)
}

fn mailer_namespace() -> Result<NameSpace, ConfigError> {
    let mut ns = NameSpace::new("mailer")?;
    ns.add_entry("host", TypeTag::String, "localhost")?;
    ns.add_entry("recipients", TypeTag::List, vec!["ops@example.com"])?;
    ns.add_entry("retry_backoff", TypeTag::Float, 1.5)?;
    Ok(ns)
}

fn build_config(env: &Environment) -> Result<Config, ConfigError> {
    let mut config = Config::from_environment(env)?;
    config.add_handler_fn(|raw: &str| raw.trim().parse::<IpAddr>())?;
    config.add_namespace(&server_namespace()?)?;
    config.add_namespace(&mailer_namespace()?)?;
    Ok(config)
}

fn show(config: &Config) -> Result<(), ConfigError> {
    let server = config.get("server")?;
    let mailer = config.get("mailer")?;

    println!("environment: {}", config.app_environment());
    if let Some(bind) = server.get_custom::<IpAddr>("bind")? {
        println!("server listens on {bind}:{}", server.get("port")?);
    }
    println!("server workers: {}", server.get("workers")?);
    println!("server debug: {}", server.get("debug")?);
    println!("mailer host: {}", mailer.get("host")?);
    if let Some(recipients) = mailer.get("recipients")?.as_list() {
        for r in recipients {
            println!("mailer recipient: {r}");
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    // Subscriber first, so warnings about unset variables are not dropped.
    let _diagnostics = match diagnostics::init(&DiagnosticsConfig::from_process()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: {e}");
            None
        }
    };
    let env = Environment::from_process();

    let result = build_config(&env).and_then(|config| match cli.command {
        Commands::Show => show(&config),
        Commands::Config(args) => config.handle_and_print(&args.into_action()),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
