// StrataDB entrypoint
//!
//! Loads the configuration, bootstraps the catalog and runs SQL against the
//! system views: statements from the command line, or a `;`-separated
//! script on stdin.
//!
//! ```text
//! stratadb [--config <path>] [SQL ...]
//! ```

mod logging;

use anyhow::Result;
use datafusion::arrow::util::pretty::pretty_format_batches;
use log::info;
use std::env;
use std::path::Path;
use stratadb_configs::ServerConfig;
use stratadb_server::lifecycle::{bootstrap, execute_sql, split_statements};
use tokio::io::AsyncReadExt;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

struct CliArgs {
    config_path: Option<String>,
    statements: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut config_path = None;
    let mut statements = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(path);
            }
            _ => statements.push(arg),
        }
    }

    Ok(CliArgs {
        config_path,
        statements,
    })
}

fn load_config(path: Option<&str>) -> Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::from_file(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => ServerConfig::from_file(DEFAULT_CONFIG_PATH),
        None => {
            let mut config = ServerConfig::default();
            config.finalize()?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    let config = match load_config(args.config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_path = format!("{}/stratadb.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &log_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    info!("StrataDB v{}", env!("CARGO_PKG_VERSION"));

    let components = bootstrap(&config)?;

    let statements = if args.statements.is_empty() {
        let mut script = String::new();
        tokio::io::stdin().read_to_string(&mut script).await?;
        split_statements(&script)
    } else {
        args.statements
    };

    for sql in &statements {
        let batches = execute_sql(&components.session, sql).await?;
        println!("{}", pretty_format_batches(&batches)?);
    }

    Ok(())
}
