use clap::Parser;
use colored::Colorize;

use geoip_enricher::cli::Cli;
use geoip_enricher::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use geoip_enricher::errors::GeoIpError;
use geoip_enricher::runtime::modes::{self, Mode};
use geoip_enricher::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    // 配置必须先于日志初始化
    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));
    let config = get_config();

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let mode = modes::detect_mode(cli.command.as_ref());
    let result = match (mode, cli.command) {
        #[cfg(feature = "server")]
        (Mode::Server, _) => modes::run_server().await,
        #[cfg(feature = "cli")]
        (Mode::Cli, Some(cmd)) => modes::run_cli(cmd).await,
        _ => Err(anyhow::anyhow!(
            "No execution mode available; enable the `server` or `cli` feature"
        )),
    };

    if let Err(e) = result {
        match e.downcast_ref::<GeoIpError>() {
            Some(geo) if e.chain().count() == 1 => eprintln!("{}", geo.format_colored()),
            _ => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}
