//! CLI mode
//!
//! This module contains the one-shot commands: address lookup and
//! configuration generation. The server is started from `main`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::{GeoIpConfig, StaticConfig, get_config};
use crate::runtime::lifetime;

const DEFAULT_GENERATE_PATH: &str = "config.example.toml";

/// Run a CLI command from clap-parsed input
pub async fn run_cli(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Lookup {
            addr,
            forwarded_for,
            trust_forwarded,
            json,
        } => lookup(&addr, forwarded_for.as_deref(), trust_forwarded, json),

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force),

        Commands::Serve => Err(anyhow!("`serve` runs in server mode, not as a CLI command")),
    }
}

/// 单次查询：与中间件走同一条流水线
fn lookup(addr: &str, forwarded_for: Option<&str>, trust: bool, json: bool) -> Result<()> {
    let config = get_config();
    let geoip = GeoIpConfig {
        trust_forwarded_header: trust || config.geoip.trust_forwarded_header,
        ..config.geoip.clone()
    };

    let enricher = lifetime::startup::prepare_enricher(&geoip)?;
    let fields = enricher.enrich(addr, forwarded_for)?;

    if json {
        let output = serde_json::to_string_pretty(&fields)
            .context("Failed to serialize fields to JSON")?;
        println!("{}", output);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "GeoIP lookup:".bold().green(),
        addr.cyan(),
        enricher.store_name().dimmed()
    );
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in fields.iter() {
        println!("  {:width$}  {}", key.yellow(), value, width = width);
    }
    Ok(())
}

/// Generate example configuration file
fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| DEFAULT_GENERATE_PATH.to_string());

    // 文件已存在时，非 --force 模式下交互确认
    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("Unable to write configuration file {}", path))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set geoip.database_path to a GeoLite2-City database before starting the server".dimmed()
    );
    Ok(())
}
