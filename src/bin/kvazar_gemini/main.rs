use anyhow::{anyhow, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};
use std::sync::Arc;

use kvazar_gemini::config::Config;
use kvazar_gemini::index::ManticoreIndex;
use kvazar_gemini::router::Context;
use kvazar_gemini::server;

mod cli;
mod exporter;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./kvazar_gemini example.org
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let files = cli.host_files();

    if !files.cert.exists() {
        return Err(anyhow!("Certificate for host \"{}\" not found!", cli.host));
    }
    if !files.key.exists() {
        return Err(anyhow!("Key for host \"{}\" not found!", cli.host));
    }
    if !files.config.exists() {
        return Err(anyhow!("Host \"{}\" not configured!", cli.host));
    }

    let config = Config::load(&files.config)?;
    info!("{}", config);

    let index = ManticoreIndex::from_config(&config)?;
    let acceptor = server::tls::load_acceptor(&files.cert, &files.key)?;

    if let Some(addr) = &cli.metrics_addr {
        exporter::spawn(addr)?;
    }

    let addr = config.listen_addr();
    let ctx = Arc::new(Context::new(config, index));

    info!("server \"{}\" started on {}", cli.host, addr);
    server::serve(&addr, acceptor, ctx)
}
