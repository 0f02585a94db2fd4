use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "trust the macOS tty framebuffer driver")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Sub‑commands (ensure, status)
    #[command(subcommand)]
    pub sub: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Trust the driver credential if not done yet (default)
    Ensure,
    /// Print installation state (Exit 0 = installed or not applicable, 1 = not installed)
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let args = Args::try_parse_from(["ttydriver"]).unwrap();
        assert!(args.sub.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn config_after_subcommand() {
        let args =
            Args::try_parse_from(["ttydriver", "status", "-c", "/etc/ttydriver.toml"]).unwrap();
        assert_eq!(args.sub, Some(Cmd::Status));
        assert_eq!(args.config, Some(PathBuf::from("/etc/ttydriver.toml")));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Args::try_parse_from(["ttydriver", "uninstall"]).is_err());
    }
}
