//! Command-line interface.
//!
//! - `serve` (or no subcommand) - start the portal
//! - `seed` - upsert the demo login accounts and exit
//! - `config check` - validate the configuration file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "mediconnect")]
#[command(author, version, about = "Clinic portal for patients, doctors and nurses", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "MEDICONNECT_CONFIG", default_value = "mediconnect.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the portal server
    Serve,

    /// Create or refresh the demo login accounts
    Seed,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

impl Cli {
    /// True when the server should start
    pub fn is_serve(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }

    /// False for commands that inspect the config file themselves
    pub fn needs_config(&self) -> bool {
        !matches!(self.command, Some(Commands::Config(_)))
    }
}

/// Run a one-shot command; `serve` is handled by the binary
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Some(Commands::Seed) => cmd_seed(config).await,
        Some(Commands::Config(ConfigCommands::Check)) => match cmd_config_check(&cli.config)? {
            ConfigCheck::Invalid(_) => anyhow::bail!("Invalid configuration file"),
            ConfigCheck::Missing | ConfigCheck::Valid(_) => Ok(()),
        },
        Some(Commands::Serve) | None => Ok(()),
    }
}

async fn cmd_seed(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.server.data_dir).with_context(|| {
        format!(
            "Failed to create data directory: {}",
            config.server.data_dir.display()
        )
    })?;
    let pool = crate::db::init(&config.server.data_dir).await?;
    let count = crate::db::seed_demo_accounts(&pool)
        .await
        .context("Demo account seeding failed")?;
    println!("[OK] Seeded {} demo accounts", count);
    Ok(())
}

/// Outcome of `config check`
#[derive(Debug)]
pub enum ConfigCheck {
    Missing,
    Valid(Box<Config>),
    /// Read or parse error, formatted with its causes
    Invalid(String),
}

pub fn check_config(config_path: &Path) -> ConfigCheck {
    if !config_path.exists() {
        return ConfigCheck::Missing;
    }
    match Config::load(config_path) {
        Ok(config) => ConfigCheck::Valid(Box::new(config)),
        Err(e) => ConfigCheck::Invalid(format!("{:#}", e)),
    }
}

fn cmd_config_check(config_path: &Path) -> Result<ConfigCheck> {
    println!("Checking configuration file: {}", config_path.display());
    println!();

    let outcome = check_config(config_path);
    match &outcome {
        ConfigCheck::Missing => {
            println!(
                "[!!] Configuration file not found: {}",
                config_path.display()
            );
            println!();
            println!("A default configuration will be used when starting the server.");
        }
        ConfigCheck::Valid(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  Host:         {}", config.server.host);
            println!("  Port:         {}", config.server.port);
            println!("  Data Dir:     {}", config.server.data_dir.display());
            println!("  Static Dir:   {}", config.server.static_dir.display());
            println!();
            println!("Session:");
            println!("  Idle Timeout: {} min", config.session.idle_timeout_minutes);
            println!("  Banner TTL:   {} ms", config.session.banner_timeout_ms);
            println!();
            println!("Features:");
            println!(
                "  Manual IDs:   {}",
                if config.identity.allow_manual_id {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!(
                "  Demo Seed:    {}",
                if config.seed.demo_accounts {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!();

            if config.identity.allow_manual_id {
                println!("Warnings:");
                println!("  [!] Manual ID entry is enabled - any logged-in user can act as any record");
                println!();
            }
        }
        ConfigCheck::Invalid(error) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {}", error);
            println!();
            println!("Please check the configuration file syntax and try again.");
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["mediconnect"]).unwrap();
        assert!(cli.is_serve());
        assert_eq!(cli.config, PathBuf::from("mediconnect.toml"));
    }

    #[test]
    fn test_config_check_subcommand() {
        let cli = Cli::try_parse_from(["mediconnect", "-c", "clinic.toml", "config", "check"]).unwrap();
        assert!(!cli.is_serve());
        assert_eq!(cli.command, Some(Commands::Config(ConfigCommands::Check)));
        assert_eq!(cli.config, PathBuf::from("clinic.toml"));
    }

    #[test]
    fn test_log_level_override() {
        let cli = Cli::try_parse_from(["mediconnect", "--log-level", "debug", "seed"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.command, Some(Commands::Seed));
        assert!(cli.needs_config());
    }

    #[test]
    fn test_config_check_skips_loading() {
        let cli = Cli::try_parse_from(["mediconnect", "config", "check"]).unwrap();
        assert!(!cli.needs_config());
    }

    #[test]
    fn test_config_check_reports_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let outcome = cmd_config_check(file.path()).unwrap();
        match outcome {
            ConfigCheck::Invalid(error) => assert!(error.contains("Failed to parse")),
            other => panic!("expected an invalid report, got {:?}", other),
        }
    }

    #[test]
    fn test_config_check_accepts_valid_and_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9100").unwrap();
        match check_config(file.path()) {
            ConfigCheck::Valid(config) => assert_eq!(config.server.port, 9100),
            other => panic!("expected a valid report, got {:?}", other),
        }

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_config(&dir.path().join("absent.toml")),
            ConfigCheck::Missing
        ));
    }

    #[tokio::test]
    async fn test_run_command_fails_on_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not = [valid").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["mediconnect", "-c", path.as_str(), "config", "check"]).unwrap();
        assert!(run_command(&cli, &Config::default()).await.is_err());
    }
}
