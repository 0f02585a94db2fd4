mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use ttydriver::config::TrustConfig;
use ttydriver::install::{InstallOutcome, InstallationState};

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match real_main() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn real_main() -> Result<i32> {
    let args = cli::Args::parse();

    let cfg = match &args.config {
        Some(path) => TrustConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TrustConfig::default(),
    };

    match args.sub.unwrap_or(cli::Cmd::Ensure) {
        cli::Cmd::Ensure => handle_ensure(&cfg),
        cli::Cmd::Status => handle_status(&cfg),
    }
}

fn handle_ensure(cfg: &TrustConfig) -> Result<i32> {
    let installer = cfg.installer();
    let outcome = ttydriver::install::ensure_with(&installer)
        .context("Failed to trust tty driver credential")?;

    if outcome == InstallOutcome::Installed {
        info!("tty framebuffer enabled");
    }
    Ok(0)
}

fn handle_status(cfg: &TrustConfig) -> Result<i32> {
    let state = cfg
        .installer()
        .state()
        .context("Failed to determine installation state")?;

    println!("tty driver: {state}");
    Ok(match state {
        InstallationState::NotInstalled => 1,
        InstallationState::Installed | InstallationState::NotApplicable => 0,
    })
}
